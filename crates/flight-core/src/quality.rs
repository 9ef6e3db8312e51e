//! Adaptive pixel-density governor.
//!
//! Frame deltas are folded into short sampling windows. After enough windows
//! the governor votes: mostly slow windows step the level down, mostly fast
//! windows step it up. Changes are debounced, and repeated reversals lock the
//! governor at the lower of the two levels so the surface stops flickering.

use crate::constants::{PIXEL_RATIO_MAX, PIXEL_RATIO_MIN};
use smallvec::SmallVec;

/// Discrete pixel-density steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityLevel {
    Low,
    Medium,
    High,
}

impl QualityLevel {
    pub fn pixel_ratio(self) -> f32 {
        match self {
            QualityLevel::Low => PIXEL_RATIO_MIN,
            QualityLevel::Medium => 1.25,
            QualityLevel::High => PIXEL_RATIO_MAX,
        }
    }

    pub fn lower(self) -> Option<Self> {
        match self {
            QualityLevel::Low => None,
            QualityLevel::Medium => Some(QualityLevel::Low),
            QualityLevel::High => Some(QualityLevel::Medium),
        }
    }

    pub fn higher(self) -> Option<Self> {
        match self {
            QualityLevel::Low => Some(QualityLevel::Medium),
            QualityLevel::Medium => Some(QualityLevel::High),
            QualityLevel::High => None,
        }
    }

    /// Highest level whose ratio does not exceed `max_ratio`.
    pub fn capped(max_ratio: f32) -> Self {
        [QualityLevel::High, QualityLevel::Medium]
            .into_iter()
            .find(|l| l.pixel_ratio() <= max_ratio + 1e-6)
            .unwrap_or(QualityLevel::Low)
    }
}

/// Device pixel ratio actually used for the backing store.
///
/// Never above the device's own ratio (no supersampling) and never below 1.
pub fn effective_pixel_ratio(level: QualityLevel, device_ratio: f32) -> f32 {
    level
        .pixel_ratio()
        .min(device_ratio.max(PIXEL_RATIO_MIN))
        .clamp(PIXEL_RATIO_MIN, PIXEL_RATIO_MAX)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GovernorConfig {
    pub window_sec: f32,
    pub windows_per_decision: usize,
    pub lower_fps: f32,
    pub upper_fps: f32,
    pub vote_threshold: f32,
    pub debounce_sec: f32,
    pub max_flipflops: u32,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            window_sec: 0.25,
            windows_per_decision: 10,
            lower_fps: 50.0,
            upper_fps: 58.0,
            vote_threshold: 0.75,
            debounce_sec: 2.0,
            max_flipflops: 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Down,
    Up,
}

/// Emitted when the governor moves to a new level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityChange {
    pub from: QualityLevel,
    pub to: QualityLevel,
}

#[derive(Clone, Debug)]
pub struct QualityGovernor {
    config: GovernorConfig,
    level: QualityLevel,
    ceiling: QualityLevel,
    window_time: f32,
    window_frames: u32,
    window_fps: SmallVec<[f32; 16]>,
    since_change: f32,
    last_direction: Option<Direction>,
    flipflops: u32,
    locked: bool,
}

impl QualityGovernor {
    /// Start at `ceiling` and only ever move within `[Low, ceiling]`.
    pub fn new(config: GovernorConfig, ceiling: QualityLevel) -> Self {
        Self {
            config,
            level: ceiling,
            ceiling,
            window_time: 0.0,
            window_frames: 0,
            window_fps: SmallVec::new(),
            // The first decision is not held back by the debounce.
            since_change: config.debounce_sec,
            last_direction: None,
            flipflops: 0,
            locked: false,
        }
    }

    #[inline]
    pub fn level(&self) -> QualityLevel {
        self.level
    }

    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.level.pixel_ratio()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn flipflops(&self) -> u32 {
        self.flipflops
    }

    /// Feed one frame delta; returns the change if the level moved.
    pub fn record_frame(&mut self, dt_sec: f32) -> Option<QualityChange> {
        if !(dt_sec > 0.0) || !dt_sec.is_finite() {
            return None;
        }
        self.since_change += dt_sec;
        self.window_time += dt_sec;
        self.window_frames += 1;
        if self.window_time < self.config.window_sec {
            return None;
        }

        self.window_fps
            .push(self.window_frames as f32 / self.window_time);
        self.window_time = 0.0;
        self.window_frames = 0;
        if self.window_fps.len() < self.config.windows_per_decision {
            return None;
        }

        let n = self.window_fps.len() as f32;
        let slow = self
            .window_fps
            .iter()
            .filter(|fps| **fps < self.config.lower_fps)
            .count() as f32;
        let fast = self
            .window_fps
            .iter()
            .filter(|fps| **fps > self.config.upper_fps)
            .count() as f32;
        self.window_fps.clear();

        let direction = if slow / n >= self.config.vote_threshold {
            Direction::Down
        } else if fast / n >= self.config.vote_threshold {
            Direction::Up
        } else {
            return None;
        };
        self.apply(direction)
    }

    fn apply(&mut self, direction: Direction) -> Option<QualityChange> {
        if self.locked || self.since_change < self.config.debounce_sec {
            return None;
        }
        let next = match direction {
            Direction::Down => self.level.lower(),
            Direction::Up => self.level.higher().filter(|l| *l <= self.ceiling),
        }?;

        if self.last_direction.is_some_and(|d| d != direction) {
            self.flipflops += 1;
        }
        self.last_direction = Some(direction);

        let change = QualityChange {
            from: self.level,
            to: next,
        };
        self.level = next;
        self.since_change = 0.0;

        if self.flipflops >= self.config.max_flipflops {
            self.level = change.from.min(change.to);
            self.locked = true;
            log::warn!(
                "[quality] locked at {:?} after {} reversals",
                self.level,
                self.flipflops
            );
            return Some(QualityChange {
                from: change.from,
                to: self.level,
            })
            .filter(|c| c.from != c.to);
        }

        log::info!(
            "[quality] {:?} -> {:?} (pixel ratio {:.2})",
            change.from,
            change.to,
            change.to.pixel_ratio()
        );
        Some(change)
    }
}

impl Default for QualityGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default(), QualityLevel::High)
    }
}
