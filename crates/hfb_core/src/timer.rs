//! Resumable timers
//!
//! Every delayed decision the referee makes (hike clock, kickoff stall clock,
//! field-goal and extra-point clocks, delayed transitions, interception and
//! kick-direction checks) is a [`Timer`] held in a [`TimerRegistry`].
//!
//! Time is the engine clock in milliseconds, which only advances on unpaused
//! host ticks. Timers never fire on their own: the orchestrator polls the
//! registry once per tick with [`TimerRegistry::take_due`].
//!
//! Each timer remembers the play epoch it was armed in so the orchestrator
//! can drop actions that outlived the play they belong to.

use serde::{Deserialize, Serialize};

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Cancellable delayed action with pause/resume
#[derive(Debug, Clone, PartialEq)]
pub struct Timer<A> {
    action: A,
    remaining_ms: u64,
    started_at_ms: u64,
    paused: bool,
    epoch: u64,
}

impl<A> Timer<A> {
    /// Arms `action` to run `delay_ms` after `now_ms`.
    pub fn new(action: A, delay_ms: u64, now_ms: u64, epoch: u64) -> Self {
        Self {
            action,
            remaining_ms: delay_ms,
            started_at_ms: now_ms,
            paused: false,
            epoch,
        }
    }

    /// Freezes the countdown. Pausing a paused timer has no effect.
    pub fn pause(&mut self, now_ms: u64) {
        if self.paused {
            return;
        }
        self.remaining_ms = self.remaining_time(now_ms);
        self.paused = true;
    }

    /// Restarts the countdown from the remainder left at the last pause.
    /// Resuming a running timer has no effect.
    pub fn resume(&mut self, now_ms: u64) {
        if !self.paused {
            return;
        }
        self.started_at_ms = now_ms;
        self.paused = false;
    }

    /// Milliseconds until the timer fires, never negative.
    pub fn remaining_time(&self, now_ms: u64) -> u64 {
        if self.paused {
            self.remaining_ms
        } else {
            (self.started_at_ms + self.remaining_ms).saturating_sub(now_ms)
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        !self.paused && now_ms >= self.started_at_ms + self.remaining_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn into_action(self) -> A {
        self.action
    }

    fn due_at(&self) -> u64 {
        self.started_at_ms + self.remaining_ms
    }
}

/// Owner of every in-flight timer
#[derive(Debug, Clone)]
pub struct TimerRegistry<A> {
    timers: Vec<(TimerId, Timer<A>)>,
    next_id: u64,
    paused: bool,
}

impl<A> Default for TimerRegistry<A> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
            paused: false,
        }
    }
}

impl<A> TimerRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action`. While the registry is paused the new timer starts
    /// paused as well.
    pub fn schedule(&mut self, action: A, delay_ms: u64, now_ms: u64, epoch: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let mut timer = Timer::new(action, delay_ms, now_ms, epoch);
        if self.paused {
            timer.pause(now_ms);
        }
        self.timers.push((id, timer));
        id
    }

    /// Cancels a timer. Returns `false` if it already fired or was stopped.
    pub fn stop(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|(timer_id, _)| *timer_id != id);
        self.timers.len() != before
    }

    pub fn stop_all(&mut self) {
        self.timers.clear();
    }

    pub fn pause_all(&mut self, now_ms: u64) {
        self.paused = true;
        for (_, timer) in &mut self.timers {
            timer.pause(now_ms);
        }
    }

    pub fn resume_all(&mut self, now_ms: u64) {
        self.paused = false;
        for (_, timer) in &mut self.timers {
            timer.resume(now_ms);
        }
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|(timer_id, _)| *timer_id == id)
    }

    pub fn remaining_time(&self, id: TimerId, now_ms: u64) -> Option<u64> {
        self.timers
            .iter()
            .find(|(timer_id, _)| *timer_id == id)
            .map(|(_, timer)| timer.remaining_time(now_ms))
    }

    /// Removes and returns every due timer, earliest deadline first (ties in
    /// scheduling order).
    pub fn take_due(&mut self, now_ms: u64) -> Vec<Timer<A>> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|(_, timer)| timer.is_due(now_ms));
        self.timers = pending;

        due.sort_by_key(|(id, timer)| (timer.due_at(), *id));
        due.into_iter().map(|(_, timer)| timer).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
