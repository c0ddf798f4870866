//! Game objects and core simulation types
//!
//! Bricks, the paddle and the ball are all `GameObject`s; the ball adds its
//! radius and stuck flag by composition.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Active,
    /// Level select menu (no gameplay)
    Menu,
    /// All levels cleared (no gameplay)
    Win,
}

/// Texture handle for a sprite
///
/// The GPU renderer shades each kind procedurally; the enum is all the
/// simulation needs to know about appearance besides color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Background,
    Ball,
    Block,
    BlockSolid,
    Paddle,
    Particle,
}

impl Sprite {
    /// Index passed to the sprite shader
    pub fn shader_index(self) -> u32 {
        match self {
            Sprite::Background => 0,
            Sprite::Ball => 1,
            Sprite::Block => 2,
            Sprite::BlockSolid => 3,
            Sprite::Paddle => 4,
            Sprite::Particle => 5,
        }
    }
}

/// A positioned, sized, moving sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Top-left corner in screen space (y grows downward)
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub color: Vec3,
    /// Rotation in radians around the centre
    pub rotation: f32,
    pub sprite: Sprite,
    /// Solid objects cannot be destroyed
    pub solid: bool,
    /// Destroyed objects are skipped by collision and drawing
    pub destroyed: bool,
}

impl GameObject {
    pub fn new(position: Vec2, size: Vec2, sprite: Sprite) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            color: Vec3::ONE,
            rotation: 0.0,
            sprite,
            solid: false,
            destroyed: false,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    /// Centre of the object's bounding box
    #[inline]
    pub fn center(&self) -> Vec2 {
        crate::box_center(self.position, self.size)
    }

    /// Half of the object's size
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// The ball: a game object with a radius that can ride the paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub object: GameObject,
    pub radius: f32,
    /// True while riding the paddle, waiting for launch
    pub stuck: bool,
}

impl Ball {
    /// Create a stuck ball whose bounding box starts at `position`
    pub fn new(position: Vec2, radius: f32, velocity: Vec2) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        Self {
            object: GameObject::new(position, Vec2::splat(radius * 2.0), Sprite::Ball)
                .with_velocity(velocity),
            radius,
            stuck: true,
        }
    }

    /// Centre of the ball
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.object.position + Vec2::splat(self.radius)
    }

    /// Integrate one step and bounce off the left, right and top edges.
    ///
    /// The bottom edge is left open; losing the ball is detected by the game.
    pub fn advance(&mut self, dt: f32, window_width: f32) -> Vec2 {
        if !self.stuck {
            let body = &mut self.object;
            body.position += body.velocity * dt;

            if body.position.x <= 0.0 {
                body.velocity.x = -body.velocity.x;
                body.position.x = 0.0;
            } else if body.position.x + body.size.x >= window_width {
                body.velocity.x = -body.velocity.x;
                body.position.x = window_width - body.size.x;
            }

            if body.position.y <= 0.0 {
                body.velocity.y = -body.velocity.y;
                body.position.y = 0.0;
            }
        }
        self.object.position
    }

    /// Place the ball and put it back on the paddle
    pub fn reset(&mut self, position: Vec2, velocity: Vec2) {
        self.object.position = position;
        self.object.velocity = velocity;
        self.stuck = true;
    }
}
