// Host-side tests for the frame loop state machine.

use flight_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct ManualScheduler {
    next: i32,
    scheduled: Vec<i32>,
    cancelled: Vec<i32>,
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> Option<i32> {
        self.next += 1;
        self.scheduled.push(self.next);
        Some(self.next)
    }

    fn cancel(&mut self, handle: i32) {
        self.cancelled.push(handle);
    }
}

#[test]
fn running_loop_reschedules_every_frame() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    assert_eq!(lp.state(), LoopState::Idle);
    lp.start(&mut sched);
    assert!(lp.is_running());
    assert_eq!(lp.pending(), Some(1));

    let ran = Cell::new(0);
    for _ in 0..5 {
        assert!(lp.on_frame(&mut sched, || ran.set(ran.get() + 1)));
    }
    assert_eq!(ran.get(), 5);
    assert_eq!(lp.frames(), 5);
    assert_eq!(lp.pending(), Some(6));
}

#[test]
fn stop_cancels_the_pending_callback() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);
    lp.on_frame(&mut sched, || {});
    let pending = lp.pending();
    lp.stop(&mut sched);
    assert_eq!(lp.state(), LoopState::Stopped);
    assert_eq!(lp.pending(), None);
    assert_eq!(sched.cancelled, pending.into_iter().collect::<Vec<_>>());
}

#[test]
fn no_frame_runs_after_stop() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);
    lp.stop(&mut sched);

    let sentinel = Cell::new(false);
    // A callback already queued by the browser still fires once.
    assert!(!lp.on_frame(&mut sched, || sentinel.set(true)));
    assert!(!sentinel.get());
    assert_eq!(lp.frames(), 0);
    assert_eq!(sched.scheduled.len(), 1);
}

#[test]
fn start_only_works_from_idle() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);
    lp.start(&mut sched);
    assert_eq!(sched.scheduled.len(), 1);

    lp.stop(&mut sched);
    lp.start(&mut sched);
    assert_eq!(lp.state(), LoopState::Stopped);
    assert_eq!(sched.scheduled.len(), 1);
}

#[test]
fn stop_twice_is_harmless() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);
    lp.stop(&mut sched);
    lp.stop(&mut sched);
    assert_eq!(sched.cancelled.len(), 1);
}

/// Scheduler whose log outlives it, so tests can inspect it after a drop.
#[derive(Clone, Default)]
struct SharedScheduler {
    log: Rc<RefCell<ManualScheduler>>,
}

impl FrameScheduler for SharedScheduler {
    fn schedule(&mut self) -> Option<i32> {
        self.log.borrow_mut().schedule()
    }

    fn cancel(&mut self, handle: i32) {
        self.log.borrow_mut().cancel(handle);
    }
}

#[test]
fn dropping_the_guard_stops_a_loop_the_callback_still_holds() {
    let sched = SharedScheduler::default();
    let frame_loop = Rc::new(RefCell::new(FrameLoop::new()));
    let mut callback_sched = sched.clone();
    let callback_loop = frame_loop.clone();

    let guard = LoopGuard::new(frame_loop, sched.clone());
    callback_loop.borrow_mut().start(&mut callback_sched);
    callback_loop.borrow_mut().on_frame(&mut callback_sched, || {});
    let pending = guard.frame_loop().borrow().pending();
    assert!(pending.is_some());
    drop(guard);

    assert_eq!(sched.log.borrow().cancelled, pending.into_iter().collect::<Vec<_>>());
    assert_eq!(callback_loop.borrow().state(), LoopState::Stopped);

    // The browser may still deliver the frame that was already queued.
    let sentinel = Cell::new(false);
    let scheduled_before = sched.log.borrow().scheduled.len();
    assert!(!callback_loop
        .borrow_mut()
        .on_frame(&mut callback_sched, || sentinel.set(true)));
    assert!(!sentinel.get());
    assert_eq!(sched.log.borrow().scheduled.len(), scheduled_before);
}

#[test]
fn explicit_stop_then_drop_cancels_once() {
    let sched = SharedScheduler::default();
    let frame_loop = Rc::new(RefCell::new(FrameLoop::new()));
    frame_loop.borrow_mut().start(&mut sched.clone());
    let mut guard = LoopGuard::new(frame_loop, sched.clone());
    guard.stop();
    drop(guard);
    assert_eq!(sched.log.borrow().cancelled, vec![1]);
}
