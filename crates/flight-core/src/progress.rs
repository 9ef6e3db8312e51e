/// Loading progress over a fixed list of preparation steps.
///
/// Reported as 0–100 to the external loading overlay. Monotonic: completing a
/// step twice does not count twice, and the value never decreases.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadProgress {
    total: u32,
    completed: u32,
}

impl LoadProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: 0,
        }
    }

    /// Mark one more step as done. Returns the new percent.
    pub fn complete_step(&mut self) -> f32 {
        self.completed = (self.completed + 1).min(self.total);
        self.percent()
    }

    /// Jump straight to done, e.g. when a backend needs no assets.
    pub fn finish(&mut self) -> f32 {
        self.completed = self.total;
        self.percent()
    }

    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f32 * 100.0 / self.total as f32
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }

    /// Overlay status line.
    pub fn status_text(&self) -> String {
        if self.is_done() {
            "Access Granted".to_string()
        } else {
            format!("Initializing Secure Environment... {}%", self.percent().round())
        }
    }
}
