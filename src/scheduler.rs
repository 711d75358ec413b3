//! Delayed one-shot tasks on the host clock.
//!
//! Tasks run on the host's callback thread, never on a timer thread.
//! There is no cancellation: once scheduled, a task runs even if the level
//! session that scheduled it has ended.

use std::cell::{Cell, RefCell};
use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Host facility for running a task after a delay.
pub trait Scheduler {
    /// Runs `task` once, after `delay` of host-clock time has elapsed.
    fn schedule(&self, delay: Duration, task: Task);
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Scheduler driven by per-frame `tick` calls from the host.
///
/// Time only advances through `tick`, so a paused host clock also pauses
/// pending tasks.
#[derive(Default)]
pub struct FrameScheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host-clock time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Advances the clock by `dt` and runs every task that came due, in
    /// deadline order (ties in scheduling order). Returns how many ran.
    ///
    /// Tasks scheduled by a running task with zero delay run on the next
    /// tick, not this one.
    pub fn tick(&self, dt: Duration) -> usize {
        let now = self.now.get() + dt;
        self.now.set(now);
        self.run_due(|p| p.due <= now)
    }

    /// Runs every pending task immediately, regardless of its deadline.
    pub fn drain(&self) -> usize {
        self.run_due(|_| true)
    }

    fn run_due(&self, is_due: impl Fn(&Pending) -> bool) -> usize {
        let mut due: Vec<Pending> = {
            let mut pending = self.pending.borrow_mut();
            let (ready, waiting): (Vec<_>, Vec<_>) = pending.drain(..).partition(|p| is_due(p));
            *pending = waiting;
            ready
        };
        due.sort_by_key(|p| (p.due, p.seq));

        let ran = due.len();
        for pending in due {
            (pending.task)();
        }
        ran
    }
}

impl Scheduler for FrameScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.pending.borrow_mut().push(Pending {
            due: self.now.get() + delay,
            seq,
            task,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn log_task(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Task {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn task_waits_for_its_delay() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::from_millis(500), log_task(&log, "shot"));

        assert_eq!(scheduler.tick(Duration::from_millis(200)), 0);
        assert_eq!(scheduler.tick(Duration::from_millis(200)), 0);
        assert!(log.borrow().is_empty());

        assert_eq!(scheduler.tick(Duration::from_millis(100)), 1);
        assert_eq!(*log.borrow(), vec!["shot"]);
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn zero_delay_runs_on_next_tick() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::ZERO, log_task(&log, "now"));
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.tick(Duration::ZERO), 1);
    }

    #[test]
    fn due_tasks_run_in_deadline_then_schedule_order() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::from_secs(2), log_task(&log, "late"));
        scheduler.schedule(Duration::from_secs(1), log_task(&log, "first"));
        scheduler.schedule(Duration::from_secs(1), log_task(&log, "second"));

        assert_eq!(scheduler.tick(Duration::from_secs(3)), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    }

    #[test]
    fn task_may_schedule_another_task() {
        let scheduler = Rc::new(FrameScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = Rc::clone(&scheduler);
        let inner_log = Rc::clone(&log);
        scheduler.schedule(
            Duration::ZERO,
            Box::new(move || {
                inner_log.borrow_mut().push("outer");
                inner_scheduler.schedule(Duration::ZERO, log_task(&inner_log, "inner"));
            }),
        );

        assert_eq!(scheduler.tick(Duration::ZERO), 1);
        assert_eq!(scheduler.tick(Duration::ZERO), 1);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn drain_ignores_deadlines() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::from_secs(60), log_task(&log, "shot"));
        assert_eq!(scheduler.drain(), 1);
        assert_eq!(*log.borrow(), vec!["shot"]);
    }
}
