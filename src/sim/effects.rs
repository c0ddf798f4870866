//! Post-processing effect state
//!
//! The flags are read by the composite shader; the GPU side lives in
//! `renderer::post_process`.

use serde::{Deserialize, Serialize};

/// Screen-space effects applied when compositing the scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub shake: bool,
    pub confuse: bool,
    pub chaos: bool,
    /// Seconds of shake left
    pub shake_time: f32,
}

impl Effects {
    /// Start shaking for `duration` seconds
    pub fn trigger_shake(&mut self, duration: f32) {
        if duration > 0.0 {
            self.shake_time = duration;
            self.shake = true;
        }
    }

    /// Count the shake timer down, clearing shake when it runs out
    pub fn update(&mut self, dt: f32) {
        if self.shake_time > 0.0 {
            self.shake_time -= dt;
            if self.shake_time <= 0.0 {
                self.shake_time = 0.0;
                self.shake = false;
            }
        }
    }

    /// Turn every effect off
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Flags packed for the shader: bit 0 chaos, bit 1 confuse, bit 2 shake
    pub fn bits(&self) -> u32 {
        (self.chaos as u32) | (self.confuse as u32) << 1 | (self.shake as u32) << 2
    }
}
