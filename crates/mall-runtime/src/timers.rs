//! Timer queue
//!
//! `setTimeout`/`setInterval` against a virtual millisecond clock. Tasks run
//! in due-time order, ties broken by scheduling order.

/// Timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// A scheduled task
#[derive(Debug)]
pub struct Timer<T> {
    pub id: TimerId,
    pub due_at: u64,
    /// Repeat period for intervals
    pub interval_ms: Option<u64>,
    order: u64,
    pub payload: T,
}

/// Pending timers
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    next_id: u32,
    next_order: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            next_order: 0,
        }
    }

    /// One-shot task due `delay_ms` after `now`
    pub fn set_timeout(&mut self, now: u64, delay_ms: u64, payload: T) -> TimerId {
        self.push(now + delay_ms, None, payload)
    }

    /// Repeating task; the period is at least 1ms so time always advances
    pub fn set_interval(&mut self, now: u64, period_ms: u64, payload: T) -> TimerId {
        let period = period_ms.max(1);
        self.push(now + period, Some(period), payload)
    }

    /// Re-arm a fired interval under its original id
    pub fn rearm(&mut self, fired_at: u64, id: TimerId, period_ms: u64, payload: T) {
        let order = self.bump_order();
        self.timers.push(Timer {
            id,
            due_at: fired_at + period_ms,
            interval_ms: Some(period_ms),
            order,
            payload,
        });
    }

    fn push(&mut self, due_at: u64, interval_ms: Option<u64>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let order = self.bump_order();
        self.timers.push(Timer {
            id,
            due_at,
            interval_ms,
            order,
            payload,
        });
        id
    }

    fn bump_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    pub fn clear(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    /// Remove and return the earliest task due at or before `limit`
    pub fn pop_due(&mut self, limit: u64) -> Option<Timer<T>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= limit)
            .min_by_key(|(_, t)| (t.due_at, t.order))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(index))
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
