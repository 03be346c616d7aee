// Timed, randomized enemy spawning on a horizontal ring around a point.

use std::f32::consts::TAU;
use std::path::PathBuf;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use super::assets::{AssetError, AssetServer};
use super::entity::{EnemyPlacement, Entity};

#[derive(Debug, Clone)]
pub struct SpawnerSettings {
    /// Seconds between spawns.
    pub delay: f64,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Collider radius of an enemy at size 1.0.
    pub base_collider_radius: f32,
    pub mesh: PathBuf,
    pub texture: PathBuf,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            delay: 3.0,
            min_radius: 5.0,
            max_radius: 50.0,
            min_size: 0.5,
            max_size: 4.0,
            base_collider_radius: 2.0,
            mesh: PathBuf::from("cube.obj"),
            texture: PathBuf::from("enemy_texture.bmp"),
        }
    }
}

pub struct EnemySpawner {
    settings: SpawnerSettings,
    next_spawn_at: f64,
    rng: StdRng,
}

impl EnemySpawner {
    /// The first enemy is due as soon as `now` is reached.
    pub fn new(settings: SpawnerSettings, seed: u64, now: f64) -> Self {
        Self {
            settings,
            next_spawn_at: now,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a random placement around `center`: rotation angle, spherical
    /// rotation axis, planar bearing, ring radius and size.
    pub fn roll_placement(&mut self, center: Vec3) -> EnemyPlacement {
        let s = &self.settings;
        let angle = self.rng.gen_range(0.0..TAU);
        let phi = self.rng.gen_range(0.0..TAU);
        let theta = self.rng.gen_range(0.0..TAU);
        let axis = Vec3::new(phi.cos() * theta.sin(), phi.sin(), phi.cos() * theta.cos());

        let bearing = self.rng.gen_range(0.0..TAU);
        let radius = uniform(&mut self.rng, s.min_radius, s.max_radius);
        let scale = uniform(&mut self.rng, s.min_size, s.max_size);

        EnemyPlacement {
            position: center + radius * Vec3::new(bearing.sin(), 0.0, bearing.cos()),
            axis,
            angle,
            scale,
        }
    }

    /// Spawn one enemy around `center` if the delay has elapsed.
    pub fn update(
        &mut self,
        now: f64,
        center: Vec3,
        assets: &mut impl AssetServer,
    ) -> Result<Option<Entity>, AssetError> {
        if now < self.next_spawn_at {
            return Ok(None);
        }
        self.next_spawn_at = now + self.settings.delay;

        let placement = self.roll_placement(center);
        let enemy = Entity::enemy(
            assets,
            &self.settings.mesh,
            &self.settings.texture,
            self.settings.base_collider_radius,
            placement,
        )?;
        log::debug!(
            "spawned enemy at {:?} (size {:.2})",
            placement.position,
            placement.scale
        );
        Ok(Some(enemy))
    }
}

// Inclusive uniform draw that tolerates min == max.
fn uniform(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min { rng.gen_range(min..=max) } else { min }
}
