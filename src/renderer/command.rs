//! Recorded draw calls
//!
//! Used by tests and the headless native run to observe what a frame would
//! draw without a GPU.

use glam::{Vec2, Vec4};

use super::Renderer;
use crate::sim::{Effects, Sprite};

/// A single recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginScene,
    Sprite {
        sprite: Sprite,
        position: Vec2,
        size: Vec2,
        rotation: f32,
        color: Vec4,
    },
    Particle {
        position: Vec2,
        size: Vec2,
        color: Vec4,
    },
    EndScene,
    Composite {
        effects: Effects,
        time: f32,
    },
}

/// Renderer that records every call
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    pub commands: Vec<DrawCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprites drawn, in order
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite { sprite, .. } => Some(*sprite),
            DrawCommand::Particle { .. } => Some(Sprite::Particle),
            _ => None,
        })
    }

    /// Number of quads drawn
    pub fn draw_count(&self) -> usize {
        self.sprites().count()
    }
}

impl Renderer for CommandLog {
    fn begin_scene(&mut self) {
        self.commands.push(DrawCommand::BeginScene);
    }

    fn draw_sprite(&mut self, sprite: Sprite, position: Vec2, size: Vec2, rotation: f32, color: Vec4) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            position,
            size,
            rotation,
            color,
        });
    }

    fn draw_particle(&mut self, position: Vec2, size: Vec2, color: Vec4) {
        self.commands.push(DrawCommand::Particle {
            position,
            size,
            color,
        });
    }

    fn end_scene(&mut self) {
        self.commands.push(DrawCommand::EndScene);
    }

    fn composite(&mut self, effects: &Effects, time: f32) {
        self.commands.push(DrawCommand::Composite {
            effects: effects.clone(),
            time,
        });
    }
}
