//! Event log - an audit trail of modes, rounds and faults
//!
//! The session emits [`ToyEvent`]s onto its [`EventBus`]; the app writes them
//! to `.evlog` files in the compact format from [`format`].

mod bus;
mod format;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus};
pub use format::{parse_event, parse_evlog_content, serialize_event};
pub use logger::{EventLogConfig, EventLogger};
pub use types::{RunConfig, ToyEvent};
