//! Tunable constants for spincat
//!
//! Timing, wiring, asset and layout defaults. Deployment profiles in
//! [`crate::settings`] override the game values.

use bevy::prelude::*;

// =============================================================================
// TIMING
// =============================================================================

pub const POLL_INTERVAL_MS: u64 = 50; // Input sampling cadence
pub const ANIMATION_INTERVAL_MS: u64 = 50; // Frame advance cadence

// =============================================================================
// GAME
// =============================================================================

/// Number of sensor-driven cats shown in Teasing and Game modes
pub const ENTITY_COUNT: usize = 3;

pub const CLASSIC_ROUND_LIMIT: u32 = 10;
pub const CLASSIC_HIT_COOLDOWN_MS: u64 = 1000;
pub const SPINS_ROUND_LIMIT: u32 = 7;
pub const SPINS_HIT_COOLDOWN_MS: u64 = 700;
pub const ARCADE_ROUND_LIMIT: u32 = 10;
pub const ARCADE_HIT_COOLDOWN_MS: u64 = 500;

pub const WARNING_MESSAGE: &str = "Wrong Cat Hit! Game Over!";

// =============================================================================
// WIRING (BCM pin numbers)
// =============================================================================

pub const BUTTON_PIN: u32 = 18;
pub const SENSOR_PINS: [u32; ENTITY_COUNT] = [21, 20, 2];
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Poll ticks between repeated warnings for the same faulty channel
pub const INPUT_FAULT_LOG_EVERY: u32 = 100;

// =============================================================================
// ASSETS (relative to ASSETS_DIR)
// =============================================================================

pub const ASSETS_DIR: &str = "assets";
pub const STILL_IMAGE_PATH: &str = "oiia.png";
pub const SPIN_FRAMES_DIR: &str = "spin";
pub const AMBIENT_AUDIO_PATH: &str = "oiia-short.mp3";
pub const WARNING_AUDIO_PATH: &str = "warning.mp3";

// =============================================================================
// LAYOUT
// =============================================================================

pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.25, 1.0, 0.0); // #40FF00
pub const TEXT_PRIMARY: Color = Color::srgb(0.05, 0.05, 0.05);
pub const WARNING_TEXT_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const WARNING_BACKGROUND: Color = Color::BLACK;
pub const BUTTON_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
pub const BUTTON_DISABLED_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
pub const PANEL_BACKGROUND: Color = Color::srgba(1.0, 1.0, 1.0, 0.85);

pub const SINGLE_CAT_SIZE: Vec2 = Vec2::new(420.0, 420.0);
pub const CAT_SIZE: Vec2 = Vec2::new(300.0, 300.0);
/// World-space x of each cat (20% / 50% / 80% of the window width)
pub const CAT_POSITIONS_X: [f32; ENTITY_COUNT] = [-384.0, 0.0, 384.0];

pub const PANEL_FONT_SIZE: f32 = 24.0;
pub const WARNING_FONT_SIZE: f32 = 35.0;
pub const BUTTON_FONT_SIZE: f32 = 16.0;

// =============================================================================
// KEYBOARD (desktop stand-in for the GPIO wiring)
// =============================================================================

pub const BUTTON_KEY: KeyCode = KeyCode::Space;
pub const SENSOR_KEYS: [KeyCode; ENTITY_COUNT] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
pub const TEASE_KEY: KeyCode = KeyCode::KeyT;
pub const GAME_KEY: KeyCode = KeyCode::KeyG;
pub const PLAY_AGAIN_KEY: KeyCode = KeyCode::KeyR;
