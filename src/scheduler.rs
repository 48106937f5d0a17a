//! Cooperative scheduler for the toy's timed work
//!
//! Two periodic tasks (input poll, animation) and one-shot delayed tasks
//! (next game round). Everything runs on the caller's thread: each
//! [`Scheduler::advance`] returns the tasks that are due, in a fixed order.
//! A periodic task fires at most once per advance and re-arms at
//! `now + period`, so a late tick is deferred rather than doubled.

use bevy::log::debug;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Poll,
    StartRound,
    Animate,
}

#[derive(Debug, Clone, Copy)]
struct Periodic {
    period: Duration,
    next_due: Duration,
}

impl Periodic {
    fn fire(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    poll: Periodic,
    animate: Periodic,
    one_shots: Vec<(Task, Duration)>,
}

impl Scheduler {
    /// Both periodic tasks are due immediately at `start`
    pub fn new(poll_period: Duration, animate_period: Duration, start: Duration) -> Self {
        Self {
            poll: Periodic {
                period: poll_period,
                next_due: start,
            },
            animate: Periodic {
                period: animate_period,
                next_due: start,
            },
            one_shots: Vec::new(),
        }
    }

    /// Schedule `task` once at `due`. A task of the same kind already pending
    /// is replaced, never duplicated.
    pub fn schedule_once(&mut self, task: Task, due: Duration) {
        if let Some(slot) = self.one_shots.iter_mut().find(|(t, _)| *t == task) {
            debug!("{:?} rescheduled from {:?} to {:?}", task, slot.1, due);
            slot.1 = due;
            return;
        }
        self.one_shots.push((task, due));
    }

    /// Returns true if something was pending
    pub fn cancel(&mut self, task: Task) -> bool {
        let before = self.one_shots.len();
        self.one_shots.retain(|(t, _)| *t != task);
        before != self.one_shots.len()
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.one_shots.iter().any(|(t, _)| *t == task)
    }

    pub fn due_time(&self, task: Task) -> Option<Duration> {
        match task {
            Task::Poll => Some(self.poll.next_due),
            Task::Animate => Some(self.animate.next_due),
            Task::StartRound => self
                .one_shots
                .iter()
                .find(|(t, _)| *t == task)
                .map(|(_, due)| *due),
        }
    }

    /// Earliest moment anything is due
    pub fn next_wake(&self) -> Duration {
        self.one_shots
            .iter()
            .map(|(_, due)| *due)
            .fold(self.poll.next_due.min(self.animate.next_due), Duration::min)
    }

    /// Tasks due at `now`: poll first, then round starts, then animation
    pub fn advance(&mut self, now: Duration) -> Vec<Task> {
        let mut due = Vec::new();

        if self.poll.fire(now) {
            due.push(Task::Poll);
        }

        if let Some(i) = self
            .one_shots
            .iter()
            .position(|(t, at)| *t == Task::StartRound && *at <= now)
        {
            self.one_shots.remove(i);
            due.push(Task::StartRound);
        }

        if self.animate.fire(now) {
            due.push(Task::Animate);
        }

        due
    }
}
