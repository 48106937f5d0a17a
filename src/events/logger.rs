//! Event logger - writes the audit trail of each run to disk

use bevy::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use uuid::Uuid;

use super::format::serialize_event;
use super::types::{RunConfig, ToyEvent};

/// Configuration for event logging
#[derive(Debug, Clone)]
pub struct EventLogConfig {
    pub log_dir: PathBuf,
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: true,
        }
    }
}

/// Active event logger with file handle
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    session_id: String,
    config: EventLogConfig,
}

impl EventLogger {
    /// Create a new event logger (but don't open file yet)
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            path: None,
            session_id: String::new(),
            config,
        }
    }

    /// Open `<log_dir>/<timestamp>_<uuid8>.evlog` and write the session header
    pub fn start_session(&mut self, timestamp: &str) {
        if !self.config.enabled {
            return;
        }

        self.session_id = Uuid::new_v4().to_string();

        if let Err(e) = std::fs::create_dir_all(&self.config.log_dir) {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let filename = format!("{}_{}.evlog", timestamp, &self.session_id[..8]);
        let path = self.config.log_dir.join(filename);

        match OpenOptions::new().create(true).write(true).truncate(true).open(&path) {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                info!("Event logging started: {} (session: {})", path.display(), &self.session_id[..8]);
                self.path = Some(path);

                self.log(0, &ToyEvent::SessionStart {
                    session_id: self.session_id.clone(),
                    timestamp: timestamp.to_string(),
                });
            }
            Err(e) => {
                warn!("Failed to open event log: {}", e);
            }
        }
    }

    /// Log the effective configuration (call after start_session)
    pub fn log_config(&mut self, config: RunConfig) {
        self.log(0, &ToyEvent::Config(config));
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Flush and close; later `log` calls are dropped
    pub fn end_session(&mut self) {
        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    pub fn log(&mut self, time_ms: u64, event: &ToyEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };

        if let Err(e) = writeln!(writer, "{}", serialize_event(time_ms, event)) {
            warn!("Failed to write event: {}", e);
        }
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        self.end_session();
    }
}
