//! Poll loop - reads every channel once per tick
//!
//! A faulted read counts as "not triggered" for that tick and is retried on
//! the next one. The poll itself never blocks; routing the sample happens in
//! [`SessionState::poll_tick`](crate::state::SessionState::poll_tick).

use crate::events::{EventBus, ToyEvent};
use crate::input::{FaultTracker, InputSample, InputSource, Polarity, sample_inputs};

#[derive(Debug)]
pub struct PollLoop {
    polarity: Polarity,
    faults: FaultTracker,
    ticks: u64,
    last_sample: InputSample,
}

impl PollLoop {
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            faults: FaultTracker::default(),
            ticks: 0,
            last_sample: InputSample::default(),
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_sample(&self) -> InputSample {
        self.last_sample
    }

    pub fn faults(&self) -> &FaultTracker {
        &self.faults
    }

    /// Take one sample. The first fault in a run on a channel is logged as
    /// an event; repeats only bump the tracker.
    pub fn sample(&mut self, input: &mut dyn InputSource, events: &mut EventBus) -> InputSample {
        let (sample, failed) = sample_inputs(input, self.polarity, &mut self.faults);
        for fault in failed {
            if self.faults.consecutive_faults(fault.channel) == 1 {
                events.emit(ToyEvent::InputFault {
                    channel: fault.channel,
                });
            }
        }
        self.ticks += 1;
        self.last_sample = sample;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ToyError};
    use crate::input::{Channel, Level};

    /// Sensor 0 held, sensor 2 broken for the first `broken_for` reads
    struct BenchInput {
        broken_for: u32,
        reads: u32,
    }

    impl InputSource for BenchInput {
        fn read_channel(&mut self, channel: Channel) -> Result<Level> {
            match channel {
                Channel::Sensor(0) => Ok(Level::Low),
                Channel::Sensor(2) => {
                    self.reads += 1;
                    if self.reads <= self.broken_for {
                        Err(ToyError::input_read(channel, "no such line"))
                    } else {
                        Ok(Level::Low)
                    }
                }
                _ => Ok(Level::High),
            }
        }

        fn name(&self) -> &'static str {
            "bench"
        }
    }

    #[test]
    fn test_fault_counts_as_not_triggered() {
        let mut poll = PollLoop::new(Polarity::ActiveLow);
        let mut events = EventBus::new();
        let mut input = BenchInput {
            broken_for: 3,
            reads: 0,
        };

        for _ in 0..3 {
            let sample = poll.sample(&mut input, &mut events);
            assert_eq!(sample.sensors, [true, false, false]);
        }
        assert_eq!(poll.faults().consecutive_faults(Channel::Sensor(2)), 3);

        // One event per run of faults
        let faults: Vec<_> = events.drain();
        assert_eq!(faults.len(), 1);
        assert_eq!(
            faults[0].event,
            ToyEvent::InputFault {
                channel: Channel::Sensor(2)
            }
        );

        // Recovers on the next good read
        let sample = poll.sample(&mut input, &mut events);
        assert_eq!(sample.sensors, [true, false, true]);
        assert_eq!(poll.faults().consecutive_faults(Channel::Sensor(2)), 0);
        assert_eq!(poll.ticks(), 4);
        assert_eq!(poll.last_sample(), sample);
    }
}
