//! Event bus - what the session did, stamped with session time
//!
//! [`SessionState`](crate::state::SessionState) is the only producer. The app
//! drains the bus into the [`EventLogger`](super::EventLogger) once per frame;
//! the scenario runner drains it after every step.

use std::time::Duration;

use super::types::ToyEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Milliseconds of session time
    pub time_ms: u64,
    pub event: ToyEvent,
}

#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<BusEvent>,
    now_ms: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp everything emitted from here on with `now`
    pub fn update_time(&mut self, now: Duration) {
        self.now_ms = u64::try_from(now.as_millis()).unwrap_or(u64::MAX);
    }

    pub fn emit(&mut self, event: ToyEvent) {
        self.pending.push(BusEvent {
            time_ms: self.now_ms,
            event,
        });
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_carry_emit_time() {
        let mut bus = EventBus::new();
        bus.update_time(Duration::from_millis(1500));
        bus.emit(ToyEvent::RoundStart { round: 1, target: 2 });
        bus.update_time(Duration::from_millis(1900));
        bus.emit(ToyEvent::GameStart { round_limit: 3 });

        assert_eq!(bus.len(), 2);
        let events = bus.drain();
        assert_eq!(
            events.iter().map(|e| e.time_ms).collect::<Vec<_>>(),
            vec![1500, 1900]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_long_uptime_does_not_wrap() {
        // 60 days, past what a u32 of milliseconds can hold
        let sixty_days = Duration::from_secs(60 * 24 * 60 * 60);
        let mut bus = EventBus::new();
        bus.update_time(sixty_days);
        bus.emit(ToyEvent::GameStart { round_limit: 10 });
        assert_eq!(bus.drain()[0].time_ms, 5_184_000_000);
    }
}
