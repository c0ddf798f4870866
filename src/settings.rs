//! Game settings and preferences
//!
//! Read from a JSON file natively and from LocalStorage in the browser.
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// The preset after this one, wrapping from High back to Low
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Particle pool size for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => PARTICLE_COUNT,
            QualityPreset::High => 2000,
        }
    }

    /// MSAA sample count of the offscreen scene target
    pub fn msaa_samples(&self) -> u32 {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium | QualityPreset::High => 4,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Paddle speed in pixels per second
    pub paddle_speed: f32,
    pub ball_radius: f32,
    pub initial_ball_velocity: Vec2,

    /// Level files, in play order
    pub levels: Vec<PathBuf>,

    // === Visual Effects ===
    /// Screen shake on solid brick hits
    pub screen_shake: bool,
    /// Seconds a shake lasts
    pub shake_duration: f32,
    /// Particle trail behind the ball
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, confuse or chaos)
    pub reduced_motion: bool,

    /// Seed for the particle RNG
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            paddle_speed: PLAYER_VELOCITY,
            ball_radius: BALL_RADIUS,
            initial_ball_velocity: INITIAL_BALL_VELOCITY,

            levels: ["one", "two", "three", "four"]
                .iter()
                .map(|name| PathBuf::from(format!("levels/{name}.lvl")))
                .collect(),

            screen_shake: true,
            shake_duration: SHAKE_DURATION,
            particles: true,

            reduced_motion: false,

            seed: 0x0b5e_55ed,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the trail entirely
        self.particles = preset != QualityPreset::Low;
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle pool size
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Height of the brick area (top half of the screen)
    pub fn level_height(&self) -> f32 {
        self.screen_height * 0.5
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
            Error::InvalidSettings {
                field,
                reason: reason.into(),
            }
        }

        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(invalid(
                "ball_radius",
                format!("must be positive, got {}", self.ball_radius),
            ));
        }
        for (field, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !(self.paddle_speed.is_finite() && self.paddle_speed >= 0.0) {
            return Err(invalid(
                "paddle_speed",
                format!("must be zero or more, got {}", self.paddle_speed),
            ));
        }
        if !self.initial_ball_velocity.is_finite() {
            return Err(invalid("initial_ball_velocity", "must be finite"));
        }
        if !(self.shake_duration.is_finite() && self.shake_duration >= 0.0) {
            return Err(invalid(
                "shake_duration",
                format!("must be zero or more, got {}", self.shake_duration),
            ));
        }
        Ok(())
    }

    /// Read settings from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Read settings from `path` if it exists, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "breakout_settings";

    /// Load settings from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage().and_then(|storage| {
            storage.get_item(Self::STORAGE_KEY).ok().flatten()
        });
        let Some(json) = stored else {
            log::info!("No stored settings, using defaults");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    /// Persist to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected settings");
                }
            }
            Err(e) => log::warn!("Settings not saved: {e}"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_playfield() {
        let settings = Settings::default();
        assert_eq!(settings.screen_width, 800.0);
        assert_eq!(settings.screen_height, 600.0);
        assert_eq!(settings.level_height(), 300.0);
        assert_eq!(settings.levels.len(), 4);
        assert_eq!(settings.max_particles(), 500);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "screen_width": 1024.0, "quality": "high" }"#)
            .expect("parse settings");
        assert_eq!(settings.screen_width, 1024.0);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.screen_height, SCREEN_HEIGHT);
        assert_eq!(settings.paddle_speed, PLAYER_VELOCITY);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = Settings::from_json("{ screen_width: ").unwrap_err();
        assert!(matches!(err, Error::SettingsParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(br#"{ "reduced_motion": true, "levels": ["a.lvl"] }"#)
            .unwrap();
        let settings = Settings::load_from_file(file.path()).expect("load settings");
        assert!(settings.reduced_motion);
        assert!(!settings.effective_screen_shake());
        assert_eq!(settings.levels, vec![PathBuf::from("a.lvl")]);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings = Settings::load_or_default("does/not/exist.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_low_preset_disables_particles() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.quality.msaa_samples(), 1);

        settings.apply_preset(settings.quality.next());
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.max_particles(), PARTICLE_COUNT);
    }

    #[test]
    fn test_preset_cycle_wraps() {
        let mut preset = QualityPreset::Low;
        for _ in 0..3 {
            preset = preset.next();
        }
        assert_eq!(preset, QualityPreset::Low);
        assert_eq!(QualityPreset::High.next(), QualityPreset::Low);
    }

    #[test]
    fn test_zero_ball_radius_rejected() {
        let err = Settings::from_json(r#"{ "ball_radius": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSettings { field: "ball_radius", .. }
        ));

        let err = Settings::from_json(r#"{ "ball_radius": -5.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { .. }));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(br#"{ "screen_height": -1.0 }"#).unwrap();
        assert!(matches!(
            Settings::load_from_file(file.path()).unwrap_err(),
            Error::InvalidSettings { field: "screen_height", .. }
        ));
        assert_eq!(Settings::load_or_default(file.path()), Settings::default());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }
}
