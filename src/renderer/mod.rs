//! Rendering
//!
//! The game talks to a `Renderer`: sprites are drawn between `begin_scene`
//! and `end_scene` into an offscreen target, then `composite` applies the
//! post-processing effects. `GpuRenderer` does this with WebGPU;
//! `CommandLog` just records the calls.

pub mod command;
pub mod gpu;
pub mod post_process;
pub mod sprite_pipeline;

use glam::{Vec2, Vec4};

use crate::sim::{Effects, Sprite};

pub use command::{CommandLog, DrawCommand};
pub use gpu::GpuRenderer;

/// Side length of a trail particle quad
pub const PARTICLE_SIZE: f32 = 10.0;

/// Draw-call seam between the simulation and a graphics backend
pub trait Renderer {
    /// Start drawing the scene into the offscreen target
    fn begin_scene(&mut self);

    /// Draw a sprite quad with its top-left corner at `position`, rotated
    /// by `rotation` radians around its centre
    fn draw_sprite(&mut self, sprite: Sprite, position: Vec2, size: Vec2, rotation: f32, color: Vec4);

    /// Draw a trail particle (additively blended by GPU backends)
    fn draw_particle(&mut self, position: Vec2, size: Vec2, color: Vec4) {
        self.draw_sprite(Sprite::Particle, position, size, 0.0, color);
    }

    /// Finish the scene and resolve the offscreen target
    fn end_scene(&mut self);

    /// Draw the resolved scene to the screen through the effect shader.
    /// `time` is wall-clock seconds and drives the effect animation.
    fn composite(&mut self, effects: &Effects, time: f32);
}
