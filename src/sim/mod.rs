//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bricks in level order)
//! - Drawing only through the `Renderer` trait

pub mod collision;
pub mod effects;
pub mod game;
pub mod input;
pub mod level;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::{
    Collision, Direction, ball_box_collision, box_overlap, resolve_brick_collision,
    resolve_paddle_collision, vector_direction,
};
pub use effects::Effects;
pub use game::Game;
pub use input::{Autopilot, Key, Keys};
pub use level::{Level, LevelSet, TileGrid};
pub use particles::{Particle, ParticleGenerator};
pub use state::{Ball, GameObject, GamePhase, Sprite};
pub use tick::{FrameClock, run_frame};
