//! Compact text format for event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = session time in milliseconds (zero-padded to at least 5 digits)
//! - CODE = event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:00000|SE|0d6f...|20260101_120000
//! T:00400|MC|idle|game
//! T:00400|RS|1|2
//! T:00950|H|1|2|550
//! T:02000|X|2|1|0
//! T:02000|GE|wrong_hit|1|550
//! ```

use super::types::{RunConfig, ToyEvent};
use crate::game::TerminationReason;
use crate::input::Channel;
use crate::mode::Mode;

/// Serialize an event to compact text format
pub fn serialize_event(time_ms: u64, event: &ToyEvent) -> String {
    let ts = format!("T:{:05}", time_ms);
    let code = event.type_code();

    let data = match event {
        ToyEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        ToyEvent::Config(config) => {
            serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string())
        }
        ToyEvent::ModeChange { from, to } => format!("{}|{}", from, to),
        ToyEvent::GameStart { round_limit } => round_limit.to_string(),
        ToyEvent::RoundStart { round, target } => format!("{}|{}", round, target),
        ToyEvent::Hit {
            round,
            target,
            elapsed_ms,
        } => format!("{}|{}|{}", round, target, elapsed_ms),
        ToyEvent::Miss {
            round,
            target,
            wrong,
        } => format!("{}|{}|{}", round, target, wrong),
        ToyEvent::GameEnd {
            reason,
            rounds,
            total_ms,
        } => format!("{}|{}|{}", reason.code(), rounds, total_ms),
        ToyEvent::InputFault { channel } => channel.to_string(),
    };

    format!("{}|{}|{}", ts, code, data)
}

/// Parse a line back into timestamp and event
pub fn parse_event(line: &str) -> Option<(u64, ToyEvent)> {
    let parts: Vec<&str> = line.trim_end().split('|').collect();
    if parts.len() < 3 {
        return None;
    }

    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u64 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => ToyEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "CF" => {
            // JSON may itself contain '|'
            let config: RunConfig = serde_json::from_str(&data.join("|")).ok()?;
            ToyEvent::Config(config)
        }
        "MC" if data.len() >= 2 => ToyEvent::ModeChange {
            from: Mode::from_str(data[0])?,
            to: Mode::from_str(data[1])?,
        },
        "GS" => ToyEvent::GameStart {
            round_limit: data[0].parse().ok()?,
        },
        "RS" if data.len() >= 2 => ToyEvent::RoundStart {
            round: data[0].parse().ok()?,
            target: data[1].parse().ok()?,
        },
        "H" if data.len() >= 3 => ToyEvent::Hit {
            round: data[0].parse().ok()?,
            target: data[1].parse().ok()?,
            elapsed_ms: data[2].parse().ok()?,
        },
        "X" if data.len() >= 3 => ToyEvent::Miss {
            round: data[0].parse().ok()?,
            target: data[1].parse().ok()?,
            wrong: data[2].parse().ok()?,
        },
        "GE" if data.len() >= 3 => ToyEvent::GameEnd {
            reason: TerminationReason::from_code(data[0])?,
            rounds: data[1].parse().ok()?,
            total_ms: data[2].parse().ok()?,
        },
        "IF" => ToyEvent::InputFault {
            channel: parse_channel(data[0])?,
        },
        _ => return None,
    };

    Some((time_ms, event))
}

/// Parse a whole .evlog file, skipping lines that don't parse
pub fn parse_evlog_content(content: &str) -> Vec<(u64, ToyEvent)> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_event)
        .collect()
}

fn parse_channel(s: &str) -> Option<Channel> {
    if s == "button" {
        return Some(Channel::Button);
    }
    s.strip_prefix("sensor_")?.parse().ok().map(Channel::Sensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_hit() {
        let event = ToyEvent::Hit {
            round: 3,
            target: 2,
            elapsed_ms: 412,
        };
        let line = serialize_event(1500, &event);
        assert_eq!(line, "T:01500|H|3|2|412");
        let (ts, parsed) = parse_event(&line).unwrap();
        assert_eq!(ts, 1500);
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_roundtrip_game_end() {
        let event = ToyEvent::GameEnd {
            reason: TerminationReason::WrongHit,
            rounds: 4,
            total_ms: 2210,
        };
        let (_, parsed) = parse_event(&serialize_event(9000, &event)).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_mode_and_channel_text() {
        let line = serialize_event(
            10,
            &ToyEvent::ModeChange {
                from: Mode::Teasing,
                to: Mode::Game,
            },
        );
        assert_eq!(line, "T:00010|MC|teasing|game");

        let fault = serialize_event(
            20,
            &ToyEvent::InputFault {
                channel: Channel::Sensor(1),
            },
        );
        assert_eq!(fault, "T:00020|IF|sensor_1");
        assert_eq!(
            parse_event(&fault).map(|(_, e)| e),
            Some(ToyEvent::InputFault {
                channel: Channel::Sensor(1)
            })
        );
    }

    #[test]
    fn test_timestamps_past_five_digits() {
        let event = ToyEvent::GameStart { round_limit: 7 };
        let line = serialize_event(5_184_000_123, &event);
        assert_eq!(line, "T:5184000123|GS|7");
        assert_eq!(parse_event(&line), Some((5_184_000_123, event)));
    }

    #[test]
    fn test_config_json_survives() {
        let config = RunConfig {
            profile: "Spins".to_string(),
            round_limit: 7,
            hit_cooldown_ms: 700,
            ..Default::default()
        };
        let line = serialize_event(0, &ToyEvent::Config(config.clone()));
        assert_eq!(parse_event(&line).map(|(_, e)| e), Some(ToyEvent::Config(config)));
    }

    #[test]
    fn test_garbage_is_skipped() {
        assert!(parse_event("hello").is_none());
        assert!(parse_event("T:00001|ZZ|1").is_none());
        let parsed = parse_evlog_content("T:00001|GS|3\nnot an event\n\nT:00002|RS|1|0\n");
        assert_eq!(parsed.len(), 2);
    }
}
