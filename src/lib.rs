//! Breakout - A classic paddle-and-ball arcade game
//!
//! Core modules:
//! - `sim`: Simulation (ball motion, collisions, levels, particles, effects)
//! - `renderer`: Draw-call seam plus the WebGPU sprite and post-processing passes
//! - `settings`: JSON configuration
//! - `error`: Crate error type

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::{Vec2, Vec3};

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta accepted by the frame clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PLAYER_SIZE: Vec2 = Vec2::new(100.0, 20.0);
    pub const PLAYER_VELOCITY: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.5;
    pub const INITIAL_BALL_VELOCITY: Vec2 = Vec2::new(100.0, -350.0);
    /// Horizontal gain applied on paddle bounces
    pub const PADDLE_BOUNCE_STRENGTH: f32 = 2.0;

    /// Particle trail
    pub const PARTICLE_COUNT: usize = 500;
    pub const PARTICLES_PER_TICK: usize = 2;

    /// Screen shake after striking a solid brick (seconds)
    pub const SHAKE_DURATION: f32 = 0.05;

    /// Brick palette
    pub const SOLID_BRICK_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.7);
    pub const BRICK_COLORS: [Vec3; 4] = [
        Vec3::new(0.2, 0.6, 1.0),
        Vec3::new(0.0, 0.7, 0.0),
        Vec3::new(0.8, 0.8, 0.4),
        Vec3::new(1.0, 0.5, 0.0),
    ];
}

/// Centre of an axis-aligned box given its top-left corner and size
#[inline]
pub fn box_center(position: glam::Vec2, size: glam::Vec2) -> glam::Vec2 {
    position + size * 0.5
}
