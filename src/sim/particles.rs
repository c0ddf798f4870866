//! Particle trail behind the ball
//!
//! Fixed pool: particles are revived in place instead of allocated, so the
//! pool never grows after construction.

use glam::{Vec2, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::GameObject;

/// A particle for the ball trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Vec4,
    /// Seconds left; dead at or below zero
    pub life: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: Vec4::ONE,
            life: 0.0,
        }
    }
}

/// Pool of trail particles
#[derive(Debug, Clone)]
pub struct ParticleGenerator {
    particles: Vec<Particle>,
    last_used: usize,
    rng: Pcg32,
}

impl ParticleGenerator {
    pub fn new(amount: usize, seed: u64) -> Self {
        Self {
            particles: vec![Particle::default(); amount],
            last_used: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Spawn `new_particles` at `object` and age the whole pool by `dt`
    pub fn update(&mut self, dt: f32, object: &GameObject, new_particles: usize, offset: Vec2) {
        if self.particles.is_empty() {
            return;
        }

        for _ in 0..new_particles {
            let index = self.first_unused();
            self.respawn(index, object, offset);
        }

        for p in self.particles.iter_mut() {
            p.life -= dt;
            if p.life > 0.0 {
                p.position -= p.velocity * dt;
                p.color.w -= dt * 2.5;
            }
        }
    }

    /// Live particles in pool order
    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.life > 0.0)
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Kill every particle
    pub fn clear(&mut self) {
        for p in self.particles.iter_mut() {
            p.life = 0.0;
        }
        self.last_used = 0;
    }

    /// Index of a dead particle, searching from the last one revived.
    /// Falls back to slot 0 when every particle is alive.
    fn first_unused(&mut self) -> usize {
        let found = (self.last_used..self.particles.len())
            .chain(0..self.last_used)
            .find(|&i| self.particles[i].life <= 0.0);
        self.last_used = found.unwrap_or(0);
        self.last_used
    }

    fn respawn(&mut self, index: usize, object: &GameObject, offset: Vec2) {
        let jitter = self.rng.random_range(-50..50) as f32 / 10.0;
        let brightness = 0.5 + self.rng.random_range(0..100) as f32 / 100.0;

        let p = &mut self.particles[index];
        p.position = object.position + Vec2::splat(jitter) + offset;
        p.color = Vec4::new(brightness, brightness, brightness, 1.0);
        p.life = 1.0;
        p.velocity = object.velocity * 0.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Sprite;

    fn ball_body() -> GameObject {
        GameObject::new(Vec2::new(100.0, 100.0), Vec2::splat(25.0), Sprite::Ball)
            .with_velocity(Vec2::new(100.0, -350.0))
    }

    #[test]
    fn test_spawns_requested_particles() {
        let mut trail = ParticleGenerator::new(10, 1);
        trail.update(0.01, &ball_body(), 2, Vec2::splat(6.25));
        assert_eq!(trail.alive().count(), 2);

        for p in trail.alive() {
            let expected = Vec2::new(100.0, 100.0) + Vec2::splat(6.25);
            assert!((p.position - expected).abs().max_element() <= 5.0 + 1.0);
            assert!(p.color.x >= 0.5 && p.color.x < 1.5);
            assert!((p.life - 0.99).abs() < 1e-5);
        }
    }

    #[test]
    fn test_particles_drift_against_velocity_and_fade() {
        let mut trail = ParticleGenerator::new(1, 7);
        let body = ball_body();
        trail.update(0.0, &body, 1, Vec2::ZERO);
        let start = *trail.alive().next().unwrap();

        trail.update(0.1, &body, 0, Vec2::ZERO);
        let p = trail.alive().next().unwrap();
        assert!((p.position - (start.position - body.velocity * 0.1 * 0.1)).length() < 1e-4);
        assert!((p.color.w - 0.75).abs() < 1e-5);
        assert!((p.life - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_particles_expire() {
        let mut trail = ParticleGenerator::new(4, 3);
        trail.update(0.0, &ball_body(), 2, Vec2::ZERO);
        trail.update(1.0, &ball_body(), 0, Vec2::ZERO);
        assert_eq!(trail.alive().count(), 0);
    }

    #[test]
    fn test_pool_never_grows() {
        let mut trail = ParticleGenerator::new(5, 3);
        for _ in 0..20 {
            trail.update(0.01, &ball_body(), 2, Vec2::ZERO);
        }
        assert_eq!(trail.capacity(), 5);
        assert_eq!(trail.alive().count(), 5);
    }

    #[test]
    fn test_same_seed_same_trail() {
        let mut a = ParticleGenerator::new(8, 42);
        let mut b = ParticleGenerator::new(8, 42);
        for _ in 0..5 {
            a.update(0.01, &ball_body(), 2, Vec2::ZERO);
            b.update(0.01, &ball_body(), 2, Vec2::ZERO);
        }
        let pa: Vec<_> = a.alive().copied().collect();
        let pb: Vec<_> = b.alive().copied().collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_empty_pool_is_inert() {
        let mut trail = ParticleGenerator::new(0, 1);
        trail.update(0.01, &ball_body(), 2, Vec2::ZERO);
        assert_eq!(trail.alive().count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut trail = ParticleGenerator::new(4, 3);
        trail.update(0.0, &ball_body(), 3, Vec2::ZERO);
        trail.clear();
        assert_eq!(trail.alive().count(), 0);
    }
}
