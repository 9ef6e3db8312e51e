//! Frame loop state machine, independent of the browser.
//!
//! The web frontend implements [`FrameScheduler`] on top of
//! `requestAnimationFrame`; tests use a manual scheduler. The loop owns the
//! pending handle so that `stop` can always cancel it, and a stopped loop
//! ignores any callback that still arrives.

use std::cell::RefCell;
use std::rc::Rc;

/// Something that can schedule (and cancel) the next frame callback.
pub trait FrameScheduler {
    /// Request the next frame; `None` if no frame source is available.
    fn schedule(&mut self) -> Option<i32>;
    fn cancel(&mut self, handle: i32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    pending: Option<i32>,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Handle of the callback currently scheduled, if any.
    pub fn pending(&self) -> Option<i32> {
        self.pending
    }

    /// Frames run since start.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running;
        self.pending = scheduler.schedule();
    }

    /// Entry point for a fired callback. Runs `frame` and re-schedules while
    /// running; returns whether `frame` ran.
    pub fn on_frame(&mut self, scheduler: &mut impl FrameScheduler, frame: impl FnOnce()) -> bool {
        self.pending = None;
        if self.state != LoopState::Running {
            return false;
        }
        self.frames += 1;
        frame();
        self.pending = scheduler.schedule();
        true
    }

    /// Cancel the pending callback and refuse any later ones.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.state = LoopState::Stopped;
    }
}

/// Shared ownership of a running loop that stops it when dropped.
///
/// The frame callback holds its own clone of the loop, so dropping the last
/// outside owner must cancel the pending frame or the callback keeps
/// re-scheduling itself.
pub struct LoopGuard<S: FrameScheduler> {
    frame_loop: Rc<RefCell<FrameLoop>>,
    scheduler: S,
}

impl<S: FrameScheduler> LoopGuard<S> {
    pub fn new(frame_loop: Rc<RefCell<FrameLoop>>, scheduler: S) -> Self {
        Self {
            frame_loop,
            scheduler,
        }
    }

    pub fn frame_loop(&self) -> &Rc<RefCell<FrameLoop>> {
        &self.frame_loop
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        self.frame_loop.borrow_mut().stop(&mut self.scheduler);
    }
}

impl<S: FrameScheduler> Drop for LoopGuard<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
