//! Collision detection and response for boxes and the ball
//!
//! Everything here is axis-aligned: bricks and the paddle are boxes, the ball
//! is a circle. Screen space has y growing downward, so the compass `Up`
//! vector (0, 1) points toward the bottom of the screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, GameObject};

/// Which face of a box the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Compass vectors, in tie-break order
    pub const COMPASS: [(Direction, Vec2); 4] = [
        (Direction::Up, Vec2::new(0.0, 1.0)),
        (Direction::Right, Vec2::new(1.0, 0.0)),
        (Direction::Down, Vec2::new(0.0, -1.0)),
        (Direction::Left, Vec2::new(-1.0, 0.0)),
    ];

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Classify a vector by the compass direction it points closest to.
///
/// Ties go to the first direction in `Up, Right, Down, Left` order. A vector
/// with no positive dot product against any direction (the zero vector)
/// classifies as `Up`.
pub fn vector_direction(target: Vec2) -> Direction {
    let target = target.normalize_or_zero();
    let mut max = 0.0;
    let mut best = Direction::Up;
    for (direction, compass) in Direction::COMPASS {
        let dot = target.dot(compass);
        if dot > max {
            max = dot;
            best = direction;
        }
    }
    best
}

/// Result of a ball-vs-box check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Whether a collision occurred
    pub hit: bool,
    /// Face of the box that was struck
    pub direction: Direction,
    /// Closest point on the box minus the ball centre
    pub difference: Vec2,
}

impl Collision {
    pub fn miss() -> Self {
        Self {
            hit: false,
            direction: Direction::Up,
            difference: Vec2::ZERO,
        }
    }
}

/// Axis-aligned box overlap with inclusive edges
pub fn box_overlap(one: &GameObject, two: &GameObject) -> bool {
    let x = one.position.x + one.size.x >= two.position.x
        && two.position.x + two.size.x >= one.position.x;
    let y = one.position.y + one.size.y >= two.position.y
        && two.position.y + two.size.y >= one.position.y;
    x && y
}

/// Circle-vs-box test
///
/// Clamps the centre-to-centre vector to the box half-extents to find the
/// closest point on the box, then compares its distance to the radius.
pub fn ball_box_collision(ball: &Ball, target: &GameObject) -> Collision {
    let center = ball.center();
    let half_extents = target.half_extents();
    let box_center = target.center();

    let clamped = (center - box_center).clamp(-half_extents, half_extents);
    let closest = box_center + clamped;
    let difference = closest - center;

    if difference.length() < ball.radius {
        Collision {
            hit: true,
            direction: vector_direction(difference),
            difference,
        }
    } else {
        Collision::miss()
    }
}

/// Bounce the ball off a brick it collided with.
///
/// Horizontal hits push the ball back out of the brick along x. Vertical hits
/// only reverse the vertical velocity: the position is left untouched.
pub fn resolve_brick_collision(ball: &mut Ball, collision: &Collision) {
    let body = &mut ball.object;
    if collision.direction.is_horizontal() {
        body.velocity.x = -body.velocity.x;
        let penetration = ball.radius - collision.difference.x.abs();
        if collision.direction == Direction::Left {
            body.position.x += penetration;
        } else {
            body.position.x -= penetration;
        }
    } else {
        body.velocity.y = -body.velocity.y;
    }
}

/// Bounce the ball off the paddle.
///
/// The further from the paddle centre the ball lands, the stronger the
/// horizontal deflection. Speed is preserved and the ball always leaves
/// upward.
pub fn resolve_paddle_collision(
    ball: &mut Ball,
    paddle: &GameObject,
    base_velocity: Vec2,
    strength: f32,
) {
    let board_center = paddle.position.x + paddle.size.x / 2.0;
    let distance = ball.center().x - board_center;
    let percentage = distance / (paddle.size.x / 2.0);

    let body = &mut ball.object;
    let old_velocity = body.velocity;
    body.velocity.x = base_velocity.x * percentage * strength;
    body.velocity = body.velocity.normalize_or_zero() * old_velocity.length();
    body.velocity.y = -body.velocity.y.abs();
}
