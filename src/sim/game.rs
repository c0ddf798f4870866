//! Game orchestrator
//!
//! Owns the paddle, ball, levels, particle trail and effect state, and runs
//! input → update → collisions → render once per tick.

use glam::{Vec2, Vec4};

use super::collision::{ball_box_collision, resolve_brick_collision, resolve_paddle_collision};
use super::effects::Effects;
use super::input::{Key, Keys};
use super::level::{LevelSet, TileGrid};
use super::particles::ParticleGenerator;
use super::state::{Ball, GameObject, GamePhase, Sprite};
use crate::consts::*;
use crate::error::Result;
use crate::renderer::{PARTICLE_SIZE, Renderer};
use crate::settings::Settings;

/// Complete game session
#[derive(Debug, Clone)]
pub struct Game {
    pub phase: GamePhase,
    pub width: f32,
    pub height: f32,
    pub levels: LevelSet,
    pub paddle: GameObject,
    pub ball: Ball,
    pub particles: ParticleGenerator,
    pub effects: Effects,
    settings: Settings,
    /// Key snapshot from the last processed tick (for release edges)
    previous_keys: Keys,
}

impl Game {
    /// Create a game over the given level grids
    pub fn new(settings: Settings, grids: Vec<TileGrid>) -> Result<Self> {
        settings.validate()?;
        let width = settings.screen_width;
        let height = settings.screen_height;
        let levels = LevelSet::new(grids, Vec2::new(width, settings.level_height()))?;

        let paddle = GameObject::new(
            Self::paddle_start(width, height),
            PLAYER_SIZE,
            Sprite::Paddle,
        );
        let ball = Ball::new(
            Self::ball_start(&paddle, settings.ball_radius),
            settings.ball_radius,
            settings.initial_ball_velocity,
        );
        let particles = ParticleGenerator::new(settings.max_particles(), settings.seed);

        log::info!(
            "Game created: {}x{}, {} levels",
            width,
            height,
            levels.len()
        );

        Ok(Self {
            phase: GamePhase::Active,
            width,
            height,
            levels,
            paddle,
            ball,
            particles,
            effects: Effects::default(),
            settings,
            previous_keys: Keys::default(),
        })
    }

    /// Create a game reading the level files named in `settings`
    pub fn load(settings: Settings) -> Result<Self> {
        let grids = settings
            .levels
            .iter()
            .map(TileGrid::load)
            .collect::<Result<Vec<_>>>()?;
        Self::new(settings, grids)
    }

    /// Create a game with the embedded levels
    pub fn with_builtin_levels(settings: Settings) -> Result<Self> {
        Self::new(settings, TileGrid::builtin()?)
    }

    fn paddle_start(width: f32, height: f32) -> Vec2 {
        Vec2::new(width / 2.0 - PLAYER_SIZE.x / 2.0, height - PLAYER_SIZE.y)
    }

    fn ball_start(paddle: &GameObject, radius: f32) -> Vec2 {
        paddle.position + Vec2::new(PLAYER_SIZE.x / 2.0 - radius, -radius * 2.0)
    }

    /// Switch to level `index` with fresh bricks and the ball on the paddle
    pub fn set_level(&mut self, index: usize) -> Result<()> {
        self.levels.select(index)?;
        self.reset_player();
        log::info!("Level {} ('{}') selected", index, self.levels.current_name());
        Ok(())
    }

    /// Run one tick: input then simulation
    pub fn tick(&mut self, dt: f32, keys: &Keys) {
        self.process_input(dt, keys);
        self.update(dt);
    }

    /// Move the paddle and launch the ball from the current key snapshot
    pub fn process_input(&mut self, dt: f32, keys: &Keys) {
        if self.phase == GamePhase::Active {
            let velocity = self.settings.paddle_speed * dt;
            let before = self.paddle.position.x;
            let mut x = before;
            if keys.is_pressed(Key::Left) {
                x -= velocity;
            }
            if keys.is_pressed(Key::Right) {
                x += velocity;
            }
            x = x.clamp(0.0, (self.width - self.paddle.size.x).max(0.0));
            self.paddle.position.x = x;

            if self.ball.stuck {
                self.ball.object.position.x += x - before;
                if keys.released(&self.previous_keys, Key::Launch) {
                    self.ball.stuck = false;
                    log::debug!("Ball launched at x={:.1}", self.ball.center().x);
                }
            }
        }
        self.previous_keys = *keys;
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.ball.advance(dt, self.width);
        self.do_collisions();

        let offset = Vec2::splat(self.ball.radius / 2.0);
        self.particles
            .update(dt, &self.ball.object, PARTICLES_PER_TICK, offset);

        self.effects.update(dt);

        if self.ball.object.position.y >= self.height {
            log::info!(
                "Ball lost, resetting level '{}'",
                self.levels.current_name()
            );
            self.reset_level();
            self.reset_player();
        }
    }

    /// Resolve ball-vs-brick and ball-vs-paddle collisions
    pub fn do_collisions(&mut self) {
        let mut hit_solid = false;

        for brick in self
            .levels
            .current_mut()
            .bricks
            .iter_mut()
            .filter(|b| !b.destroyed)
        {
            let collision = ball_box_collision(&self.ball, brick);
            if !collision.hit {
                continue;
            }
            if brick.solid {
                hit_solid = true;
            } else {
                brick.destroyed = true;
                log::debug!("Brick at {:?} destroyed", brick.position);
            }
            resolve_brick_collision(&mut self.ball, &collision);
        }

        if hit_solid && self.settings.effective_screen_shake() {
            self.effects.trigger_shake(self.settings.shake_duration);
        }

        if !self.ball.stuck {
            let collision = ball_box_collision(&self.ball, &self.paddle);
            if collision.hit {
                resolve_paddle_collision(
                    &mut self.ball,
                    &self.paddle,
                    self.settings.initial_ball_velocity,
                    PADDLE_BOUNCE_STRENGTH,
                );
            }
        }
    }

    /// Rebuild the current level's bricks
    pub fn reset_level(&mut self) {
        self.levels.reset();
    }

    /// Put the paddle back in the middle and the ball on top of it.
    /// The trail and any running effects are cleared.
    pub fn reset_player(&mut self) {
        self.paddle.size = PLAYER_SIZE;
        self.paddle.position = Self::paddle_start(self.width, self.height);
        let start = Self::ball_start(&self.paddle, self.ball.radius);
        self.ball.reset(start, self.settings.initial_ball_velocity);
        self.particles.clear();
        self.effects.clear();
    }

    /// True once the current level has no destructible bricks left
    pub fn level_completed(&self) -> bool {
        self.levels.current().is_completed()
    }

    /// Draw the frame: background, bricks, paddle, particles, ball
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, time: f32) {
        if self.phase != GamePhase::Active {
            return;
        }

        renderer.begin_scene();
        renderer.draw_sprite(
            Sprite::Background,
            Vec2::ZERO,
            Vec2::new(self.width, self.height),
            0.0,
            Vec4::ONE,
        );
        for brick in self.levels.current().live_bricks() {
            draw_object(renderer, brick);
        }
        draw_object(renderer, &self.paddle);
        for p in self.particles.alive() {
            renderer.draw_particle(p.position, Vec2::splat(PARTICLE_SIZE), p.color);
        }
        draw_object(renderer, &self.ball.object);
        renderer.end_scene();
        renderer.composite(&self.effects, time);
    }
}

fn draw_object<R: Renderer + ?Sized>(renderer: &mut R, object: &GameObject) {
    renderer.draw_sprite(
        object.sprite,
        object.position,
        object.size,
        object.rotation,
        object.color.extend(1.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::renderer::{CommandLog, DrawCommand};
    use std::io::Write;

    fn game_with(levels: &[&str]) -> Game {
        let grids = levels
            .iter()
            .enumerate()
            .map(|(i, text)| TileGrid::parse(&format!("level{i}"), text).unwrap())
            .collect();
        Game::new(Settings::default(), grids).unwrap()
    }

    /// Free the ball and place its centre at `center`
    fn launch_at(game: &mut Game, center: Vec2, velocity: Vec2) {
        game.ball.stuck = false;
        game.ball.object.position = center - Vec2::splat(game.ball.radius);
        game.ball.object.velocity = velocity;
    }

    #[test]
    fn test_initial_layout() {
        let game = game_with(&["2 2\n"]);
        assert_eq!(game.phase, GamePhase::Active);
        assert_eq!(game.paddle.position, Vec2::new(350.0, 580.0));
        assert_eq!(game.ball.object.position, Vec2::new(387.5, 555.0));
        assert!(game.ball.stuck);
        assert_eq!(game.ball.object.velocity, INITIAL_BALL_VELOCITY);
        assert_eq!(game.levels.current().bricks[0].size, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut game = game_with(&["2\n"]);
        game.process_input(0.1, &Keys::with(&[Key::Left]));
        assert_eq!(game.paddle.position.x, 300.0);

        game.process_input(10.0, &Keys::with(&[Key::Left]));
        assert_eq!(game.paddle.position.x, 0.0);

        game.process_input(10.0, &Keys::with(&[Key::Right]));
        assert_eq!(game.paddle.position.x, 700.0);
    }

    #[test]
    fn test_stuck_ball_rides_paddle() {
        let mut game = game_with(&["2\n"]);
        let offset = game.ball.object.position.x - game.paddle.position.x;
        game.process_input(0.1, &Keys::with(&[Key::Right]));
        assert_eq!(game.ball.object.position.x - game.paddle.position.x, offset);

        game.process_input(10.0, &Keys::with(&[Key::Right]));
        assert_eq!(game.ball.object.position.x - game.paddle.position.x, offset);
    }

    #[test]
    fn test_launch_on_release() {
        let mut game = game_with(&["2\n"]);
        game.process_input(0.01, &Keys::with(&[Key::Launch]));
        assert!(game.ball.stuck);
        game.process_input(0.01, &Keys::with(&[Key::Launch]));
        assert!(game.ball.stuck);
        game.process_input(0.01, &Keys::default());
        assert!(!game.ball.stuck);
        assert_eq!(game.ball.object.velocity, INITIAL_BALL_VELOCITY);
    }

    #[test]
    fn test_input_ignored_outside_active() {
        let mut game = game_with(&["2\n"]);
        game.phase = GamePhase::Menu;
        game.process_input(0.1, &Keys::with(&[Key::Left]));
        assert_eq!(game.paddle.position.x, 350.0);
    }

    #[test]
    fn test_stuck_ball_stays_put_during_update() {
        let mut game = game_with(&["2\n"]);
        let before = game.ball.object.position;
        game.update(SIM_DT);
        assert_eq!(game.ball.object.position, before);
        assert!(game.particles.alive().count() > 0);
    }

    #[test]
    fn test_destructible_brick_destroyed() {
        let mut game = game_with(&["2\n"]);
        launch_at(&mut game, Vec2::new(400.0, 310.0), Vec2::new(0.0, -300.0));
        game.do_collisions();

        assert!(game.levels.current().bricks[0].destroyed);
        assert!(game.level_completed());
        assert_eq!(game.ball.object.velocity.y, 300.0);
        assert!(!game.effects.shake);
    }

    #[test]
    fn test_solid_brick_survives_and_shakes() {
        let mut game = game_with(&["1\n"]);
        launch_at(&mut game, Vec2::new(400.0, 310.0), Vec2::new(0.0, -300.0));
        game.do_collisions();

        assert!(!game.levels.current().bricks[0].destroyed);
        assert!(game.effects.shake);
        assert_eq!(game.effects.shake_time, SHAKE_DURATION);
        assert_eq!(game.ball.object.velocity.y, 300.0);

        // Shake wears off
        launch_at(&mut game, Vec2::new(400.0, 450.0), Vec2::ZERO);
        game.update(0.1);
        assert!(!game.effects.shake);
    }

    #[test]
    fn test_reduced_motion_suppresses_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let grids = vec![TileGrid::parse("solid", "1\n").unwrap()];
        let mut game = Game::new(settings, grids).unwrap();
        launch_at(&mut game, Vec2::new(400.0, 310.0), Vec2::new(0.0, -300.0));
        game.do_collisions();
        assert!(!game.effects.shake);
    }

    #[test]
    fn test_destroyed_bricks_are_ignored() {
        let mut game = game_with(&["2\n"]);
        game.levels.current_mut().bricks[0].destroyed = true;
        launch_at(&mut game, Vec2::new(400.0, 310.0), Vec2::new(0.0, -300.0));
        game.do_collisions();
        assert_eq!(game.ball.object.velocity.y, -300.0);
    }

    #[test]
    fn test_paddle_dead_centre_rebound_is_vertical() {
        let mut game = game_with(&["2\n"]);
        let speed = Vec2::new(0.0, 350.0);
        launch_at(&mut game, Vec2::new(400.0, 570.0), speed);
        game.do_collisions();

        let v = game.ball.object.velocity;
        assert!(v.x.abs() < 1e-3);
        assert!(v.y < 0.0);
        assert!((v.length() - speed.length()).abs() < 1e-2);
    }

    #[test]
    fn test_paddle_edge_rebound_is_angled() {
        let mut game = game_with(&["2\n"]);
        let velocity = Vec2::new(-100.0, 350.0);
        launch_at(&mut game, Vec2::new(448.0, 570.0), velocity);
        game.do_collisions();

        let v = game.ball.object.velocity;
        assert!(v.x > 150.0);
        assert!(v.y < 0.0);
        assert!((v.length() - velocity.length()).abs() < 1e-2);
    }

    #[test]
    fn test_ball_lost_resets_level_and_player() {
        let mut game = game_with(&["2 2\n", "3\n"]);
        game.levels.current_mut().bricks[0].destroyed = true;
        game.effects.trigger_shake(1.0);
        game.effects.chaos = true;
        game.process_input(0.2, &Keys::with(&[Key::Left]));
        launch_at(&mut game, Vec2::new(20.0, 590.0), Vec2::new(0.0, 300.0));

        game.update(0.1);

        assert!(game.levels.current().bricks.iter().all(|b| !b.destroyed));
        assert_eq!(game.levels.current_index(), 0);
        assert!(game.ball.stuck);
        assert_eq!(game.paddle.position, Vec2::new(350.0, 580.0));
        assert_eq!(game.ball.object.position, Vec2::new(387.5, 555.0));
        assert_eq!(game.particles.alive().count(), 0);
        assert_eq!(game.effects, Effects::default());
    }

    #[test]
    fn test_update_runs_outside_active() {
        let mut game = game_with(&["2\n"]);
        game.phase = GamePhase::Menu;
        launch_at(&mut game, Vec2::new(400.0, 450.0), Vec2::new(100.0, -200.0));
        let before = game.ball.object.position;

        game.update(0.1);

        let moved = game.ball.object.position - before;
        assert!((moved - Vec2::new(10.0, -20.0)).length() < 1e-4);
        assert!(game.particles.alive().count() > 0);
    }

    #[test]
    fn test_zero_ball_radius_rejected() {
        let settings = Settings {
            ball_radius: 0.0,
            ..Default::default()
        };
        let err = Game::with_builtin_levels(settings).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSettings { field: "ball_radius", .. }
        ));
    }

    #[test]
    fn test_load_level_files() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        first.write_all(b"1 2 0\n2 3 4\n").unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        second.write_all(b"5\n").unwrap();

        let settings = Settings {
            levels: vec![first.path().to_path_buf(), second.path().to_path_buf()],
            ..Default::default()
        };
        let mut game = Game::load(settings).unwrap();

        assert_eq!(game.levels.len(), 2);
        let bricks = &game.levels.current().bricks;
        assert_eq!(bricks.len(), 5);
        assert!(bricks[0].solid);
        assert_eq!(bricks[0].position, Vec2::ZERO);
        assert_eq!(bricks[0].size, Vec2::new(800.0 / 3.0, 150.0));
        assert_eq!(bricks[4].position, Vec2::new(1600.0 / 3.0, 150.0));

        game.set_level(1).unwrap();
        assert_eq!(game.levels.current().bricks[0].size, Vec2::new(800.0, 300.0));
    }

    #[test]
    fn test_load_missing_level_file() {
        let settings = Settings {
            levels: vec!["no/such/level.lvl".into()],
            ..Default::default()
        };
        assert!(matches!(
            Game::load(settings).unwrap_err(),
            Error::LevelRead { .. }
        ));
    }

    #[test]
    fn test_set_level() {
        let mut game = game_with(&["2 2\n", "3\n"]);
        game.set_level(1).unwrap();
        assert_eq!(game.levels.current().bricks.len(), 1);
        assert!(game.set_level(5).is_err());
        assert_eq!(game.levels.current_index(), 1);
    }

    #[test]
    fn test_render_order() {
        let mut game = game_with(&["1 2 0\n"]);
        game.update(SIM_DT);
        game.levels.current_mut().bricks[1].destroyed = true;

        let mut log = CommandLog::new();
        game.render(&mut log, 1.5);

        assert_eq!(log.commands.first(), Some(&DrawCommand::BeginScene));
        let sprites: Vec<_> = log.sprites().collect();
        let particles = game.particles.alive().count();
        assert!(particles > 0);

        assert_eq!(sprites[0], Sprite::Background);
        assert_eq!(sprites[1], Sprite::BlockSolid);
        assert_eq!(sprites[2], Sprite::Paddle);
        assert!(sprites[3..3 + particles].iter().all(|s| *s == Sprite::Particle));
        assert_eq!(sprites[3 + particles], Sprite::Ball);
        assert_eq!(sprites.len(), 4 + particles);

        let n = log.commands.len();
        assert_eq!(log.commands[n - 2], DrawCommand::EndScene);
        assert_eq!(
            log.commands[n - 1],
            DrawCommand::Composite {
                effects: Effects::default(),
                time: 1.5
            }
        );
    }

    #[test]
    fn test_render_skipped_outside_active() {
        let mut game = game_with(&["2\n"]);
        game.phase = GamePhase::Win;
        let mut log = CommandLog::new();
        game.render(&mut log, 0.0);
        assert!(log.commands.is_empty());
    }

    #[test]
    fn test_builtin_game() {
        let game = Game::with_builtin_levels(Settings::default()).unwrap();
        assert_eq!(game.levels.len(), 4);
        assert!(!game.level_completed());
    }
}
