//! Persistent settings and deployment profiles
//!
//! Saves and loads the toy's configuration (profile, timing, wiring, input
//! backend) to/from a toy_settings.json file in the config directory.
//! Command-line flags override the file for a single run.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::*;
use crate::error::{Result, ToyError};
use crate::game::GameRules;
use crate::input::Polarity;

/// Path to the settings file
pub const SETTINGS_FILE: &str = "config/toy_settings.json";

/// Round limit, cooldown and wording differ between the builds that shipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeploymentProfile {
    /// 10 rounds, 1 s between rounds
    #[default]
    Classic,
    /// 7 rounds, 700 ms between rounds
    Spins,
    /// 10 rounds, 500 ms between rounds
    Arcade,
}

/// User-facing strings for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileText {
    pub window_title: &'static str,
    pub tease_label: &'static str,
    pub tease_back_label: &'static str,
    pub game_start_label: &'static str,
    pub game_stop_label: &'static str,
    pub summary_header: &'static str,
    pub round_label: &'static str,
    pub total_label: &'static str,
    pub play_again_label: &'static str,
}

const CLASSIC_TEXT: ProfileText = ProfileText {
    window_title: "Cat Game",
    tease_label: "Teasing Mode",
    tease_back_label: "Back",
    game_start_label: "Game Mode",
    game_stop_label: "Stop Game",
    summary_header: "Game Over!",
    round_label: "Round",
    total_label: "Total time",
    play_again_label: "Play Again",
};

const SPINS_TEXT: ProfileText = ProfileText {
    window_title: "Spinning Pi-based Interactive Nonsensical System",
    tease_label: "Teasing Mode",
    tease_back_label: "Back",
    game_start_label: "Play With Cats",
    game_stop_label: "Stop Playing",
    summary_header: "The Cats Are Tired.",
    round_label: "Reaction Time",
    total_label: "Total reaction time",
    play_again_label: "Play Again",
};

impl DeploymentProfile {
    pub fn round_limit(self) -> u32 {
        match self {
            DeploymentProfile::Classic => CLASSIC_ROUND_LIMIT,
            DeploymentProfile::Spins => SPINS_ROUND_LIMIT,
            DeploymentProfile::Arcade => ARCADE_ROUND_LIMIT,
        }
    }

    pub fn hit_cooldown_ms(self) -> u64 {
        match self {
            DeploymentProfile::Classic => CLASSIC_HIT_COOLDOWN_MS,
            DeploymentProfile::Spins => SPINS_HIT_COOLDOWN_MS,
            DeploymentProfile::Arcade => ARCADE_HIT_COOLDOWN_MS,
        }
    }

    pub fn text(self) -> &'static ProfileText {
        match self {
            DeploymentProfile::Classic | DeploymentProfile::Arcade => &CLASSIC_TEXT,
            DeploymentProfile::Spins => &SPINS_TEXT,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Some(DeploymentProfile::Classic),
            "spins" => Some(DeploymentProfile::Spins),
            "arcade" => Some(DeploymentProfile::Arcade),
            _ => None,
        }
    }
}

/// Where channel levels come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputBackend {
    /// Space / 1 / 2 / 3 on the keyboard
    #[default]
    Keyboard,
    /// Linux sysfs GPIO lines
    Sysfs,
}

/// Persistent settings that survive between runs
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct ToySettings {
    pub profile: DeploymentProfile,
    /// Overrides the profile's round limit
    pub round_limit: Option<u32>,
    /// Overrides the profile's cooldown between rounds
    pub hit_cooldown_ms: Option<u64>,
    pub poll_interval_ms: u64,
    pub animation_interval_ms: u64,
    /// Flip if the sensors read reversed
    pub polarity: Polarity,
    pub input_backend: InputBackend,
    pub gpio_root: String,
    pub button_pin: u32,
    pub sensor_pins: [u32; ENTITY_COUNT],
    /// Fixed seed for target selection (None = seeded from entropy)
    pub seed: Option<u64>,
    /// Write an .evlog audit trail of each run
    pub event_log: bool,
    pub log_dir: String,
    pub assets_dir: String,
}

impl Default for ToySettings {
    fn default() -> Self {
        Self {
            profile: DeploymentProfile::Classic,
            round_limit: None,
            hit_cooldown_ms: None,
            poll_interval_ms: POLL_INTERVAL_MS,
            animation_interval_ms: ANIMATION_INTERVAL_MS,
            polarity: Polarity::ActiveLow,
            input_backend: InputBackend::Keyboard,
            gpio_root: SYSFS_GPIO_ROOT.to_string(),
            button_pin: BUTTON_PIN,
            sensor_pins: SENSOR_PINS,
            seed: None,
            event_log: true,
            log_dir: "logs".to_string(),
            assets_dir: ASSETS_DIR.to_string(),
        }
    }
}

impl ToySettings {
    /// Load settings from the default file, or return defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(Path::new(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ToyError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Apply command-line overrides (`--profile spins`, `--sysfs`, `--seed 7`, ...)
    pub fn apply_args(&mut self, args: &[String]) {
        let value_after = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
        };

        if let Some(name) = value_after("--profile") {
            match DeploymentProfile::from_str(name) {
                Some(profile) => self.profile = profile,
                None => warn!("Unknown profile '{}', keeping {:?}", name, self.profile),
            }
        }
        if let Some(rounds) = value_after("--rounds").and_then(|s| s.parse().ok()) {
            self.round_limit = Some(rounds);
        }
        if let Some(ms) = value_after("--cooldown-ms").and_then(|s| s.parse().ok()) {
            self.hit_cooldown_ms = Some(ms);
        }
        if let Some(seed) = value_after("--seed").and_then(|s| s.parse().ok()) {
            self.seed = Some(seed);
        }
        if args.iter().any(|a| a == "--sysfs") {
            self.input_backend = InputBackend::Sysfs;
        }
        if args.iter().any(|a| a == "--keyboard") {
            self.input_backend = InputBackend::Keyboard;
        }
        if args.iter().any(|a| a == "--active-high") {
            self.polarity = Polarity::ActiveHigh;
        }
        if args.iter().any(|a| a == "--active-low") {
            self.polarity = Polarity::ActiveLow;
        }
        if args.iter().any(|a| a == "--no-log") {
            self.event_log = false;
        }
    }

    pub fn game_rules(&self) -> GameRules {
        GameRules {
            round_limit: self.round_limit.unwrap_or_else(|| self.profile.round_limit()),
            hit_cooldown: Duration::from_millis(
                self.hit_cooldown_ms
                    .unwrap_or_else(|| self.profile.hit_cooldown_ms()),
            ),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    pub fn text(&self) -> &'static ProfileText {
        self.profile.text()
    }

    /// Reject values the scheduler and game engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 || self.animation_interval_ms == 0 {
            return Err(ToyError::Config("tick intervals must be non-zero".to_string()));
        }
        if self.game_rules().round_limit == 0 {
            return Err(ToyError::Config("round limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_profile_rules() {
        let mut settings = ToySettings::default();
        assert_eq!(settings.game_rules().round_limit, 10);
        assert_eq!(settings.game_rules().hit_cooldown, Duration::from_millis(1000));

        settings.profile = DeploymentProfile::Spins;
        assert_eq!(settings.game_rules().round_limit, 7);
        assert_eq!(settings.game_rules().hit_cooldown, Duration::from_millis(700));

        settings.round_limit = Some(3);
        assert_eq!(settings.game_rules().round_limit, 3);
    }

    #[test]
    fn test_apply_args() {
        let mut settings = ToySettings::default();
        settings.apply_args(&args(&[
            "spincat", "--profile", "arcade", "--sysfs", "--seed", "42", "--active-high", "--no-log",
        ]));
        assert_eq!(settings.profile, DeploymentProfile::Arcade);
        assert_eq!(settings.input_backend, InputBackend::Sysfs);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.polarity, Polarity::ActiveHigh);
        assert!(!settings.event_log);
        assert_eq!(settings.game_rules().hit_cooldown, Duration::from_millis(500));
    }

    #[test]
    fn test_unknown_profile_is_ignored() {
        let mut settings = ToySettings::default();
        settings.apply_args(&args(&["spincat", "--profile", "turbo"]));
        assert_eq!(settings.profile, DeploymentProfile::Classic);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config").join("toy_settings.json");

        let mut settings = ToySettings::default();
        settings.profile = DeploymentProfile::Spins;
        settings.sensor_pins = [5, 6, 13];
        settings.save_to(&path).unwrap();

        let loaded = ToySettings::load_from(&path);
        assert_eq!(loaded.profile, DeploymentProfile::Spins);
        assert_eq!(loaded.sensor_pins, [5, 6, 13]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("toy_settings.json");
        fs::write(&path, r#"{ "profile": "Spins", "polarity": "ActiveHigh" }"#).unwrap();

        let loaded = ToySettings::load_from(&path);
        assert_eq!(loaded.profile, DeploymentProfile::Spins);
        assert_eq!(loaded.polarity, Polarity::ActiveHigh);
        assert_eq!(loaded.button_pin, BUTTON_PIN);
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let mut settings = ToySettings::default();
        assert!(settings.validate().is_ok());
        settings.poll_interval_ms = 0;
        assert!(settings.validate().is_err());
        settings.poll_interval_ms = 50;
        settings.round_limit = Some(0);
        assert!(settings.validate().is_err());
    }
}
