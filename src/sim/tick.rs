//! Fixed timestep frame clock
//!
//! Converts variable wall-clock frame deltas into a whole number of
//! `SIM_DT` simulation steps.

use super::game::Game;
use super::input::Keys;
use crate::consts::*;

/// Accumulates frame time and hands out fixed steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame delta and return how many `SIM_DT` steps to run.
    ///
    /// Deltas above `MAX_FRAME_DT` are clamped and at most `MAX_SUBSTEPS`
    /// steps are handed out; time beyond that is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Time carried over to the next frame
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Run one frame of fixed steps with the same key snapshot.
/// Returns the number of steps run.
pub fn run_frame(game: &mut Game, clock: &mut FrameClock, frame_dt: f32, keys: &Keys) -> u32 {
    let steps = clock.advance(frame_dt);
    for _ in 0..steps {
        game.tick(SIM_DT, keys);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::input::Key;

    #[test]
    fn test_sixty_hz_frame_runs_two_steps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1.0 / 60.0), 2);
        assert!(clock.leftover() < SIM_DT);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.5), MAX_SUBSTEPS);
        assert!(clock.leftover() <= SIM_DT);
        assert_eq!(clock.advance(0.0), 1);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.005), 1);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.leftover(), 0.0);
    }

    #[test]
    fn test_run_frame_moves_paddle() {
        let mut game = Game::with_builtin_levels(Settings::default()).unwrap();
        let mut clock = FrameClock::new();
        let start = game.paddle.position.x;

        let steps = run_frame(&mut game, &mut clock, 1.0 / 60.0, &Keys::with(&[Key::Left]));

        assert_eq!(steps, 2);
        let moved = start - game.paddle.position.x;
        assert!((moved - 2.0 * SIM_DT * PLAYER_VELOCITY).abs() < 1e-3);
    }
}
