//! Keyboard snapshot and autopilot
//!
//! The platform layer samples the keyboard once per frame into a `Keys`
//! value; the game only ever sees snapshots.

use serde::{Deserialize, Serialize};

use super::game::Game;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Launch,
}

impl Key {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Right => 1,
            Key::Launch => 2,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "ArrowLeft" => Some(Key::Left),
            "d" | "D" | "ArrowRight" => Some(Key::Right),
            " " => Some(Key::Launch),
            _ => None,
        }
    }
}

/// Pressed state of every key at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pressed: [bool; Key::COUNT],
}

impl Keys {
    /// Snapshot with exactly `keys` held
    pub fn with(keys: &[Key]) -> Self {
        let mut snapshot = Self::default();
        for &key in keys {
            snapshot.set(key, true);
        }
        snapshot
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        self.pressed[key.index()] = pressed;
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    /// True if `key` was held in `previous` and is up now
    pub fn released(&self, previous: &Keys, key: Key) -> bool {
        previous.is_pressed(key) && !self.is_pressed(key)
    }
}

/// Steers the paddle under the ball and launches it when stuck
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    launch_held: bool,
}

impl Autopilot {
    /// Horizontal distance (pixels) within which the paddle holds still
    pub const DEAD_ZONE: f32 = 8.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Produce this frame's key snapshot
    pub fn keys(&mut self, game: &Game) -> Keys {
        let mut keys = Keys::default();

        // Press then release: launching happens on the release edge
        if game.ball.stuck {
            self.launch_held = !self.launch_held;
            keys.set(Key::Launch, self.launch_held);
            return keys;
        }
        self.launch_held = false;

        let offset = game.ball.center().x - game.paddle.center().x;
        if offset < -Self::DEAD_ZONE {
            keys.set(Key::Left, true);
        } else if offset > Self::DEAD_ZONE {
            keys.set(Key::Right, true);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;

    #[test]
    fn test_release_edge() {
        let held = Keys::with(&[Key::Launch]);
        let up = Keys::default();
        assert!(up.released(&held, Key::Launch));
        assert!(!held.released(&held, Key::Launch));
        assert!(!held.released(&up, Key::Launch));
        assert!(!up.released(&up, Key::Launch));
    }

    #[test]
    fn test_dom_keys() {
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom_key("d"), Some(Key::Right));
        assert_eq!(Key::from_dom_key(" "), Some(Key::Launch));
        assert_eq!(Key::from_dom_key("Escape"), None);
    }

    #[test]
    fn test_autopilot_launches_then_tracks() {
        let mut game = Game::with_builtin_levels(Settings::default()).unwrap();
        let mut pilot = Autopilot::new();

        let keys = pilot.keys(&game);
        assert!(keys.is_pressed(Key::Launch));
        game.tick(SIM_DT, &keys);
        assert!(game.ball.stuck);

        let keys = pilot.keys(&game);
        assert!(!keys.is_pressed(Key::Launch));
        game.tick(SIM_DT, &keys);
        assert!(!game.ball.stuck);

        game.ball.object.position.x = 10.0;
        let keys = pilot.keys(&game);
        assert!(keys.is_pressed(Key::Left) && !keys.is_pressed(Key::Right));

        // Within the dead zone: hold still
        game.ball.object.position.x = game.paddle.center().x - game.ball.radius + 3.0;
        assert_eq!(pilot.keys(&game), Keys::default());
    }

    #[test]
    fn test_snapshot_set_and_clear() {
        let mut keys = Keys::with(&[Key::Left, Key::Right]);
        assert!(keys.is_pressed(Key::Left) && keys.is_pressed(Key::Right));
        keys.set(Key::Left, false);
        assert!(!keys.is_pressed(Key::Left));
        assert!(!keys.is_pressed(Key::Launch));
    }
}
