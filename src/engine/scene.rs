// Per-frame simulation: motion, collisions, pruning, spawning, render hand-off.
//
// Tick order:
//   1. dt = now - previous tick
//   2. move every entity along its direction
//   3. pairwise projectile/enemy collision pass → keep/discard flags
//   4. drop discarded entities (releasing their textures), keep order
//   5. player may fire one projectile
//   6. spawner may add one enemy
// Rendering (step 7) is `Scene::render`, called by the driver after `tick`.

use glam::Mat4;
use serde::{Deserialize, Serialize};
use super::assets::{AssetError, AssetServer};
use super::entity::Entity;
use super::input::Platform;
use super::player::Player;
use super::renderer::DrawTarget;
use super::spawner::EnemySpawner;

/// How entities already marked for removal take part in later pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// A marked enemy is skipped as the first operand of later pairs; a
    /// marked projectile keeps checking. Either may still be hit as the
    /// second operand.
    #[default]
    Reference,
    /// Any marked entity is skipped as the first operand.
    Symmetric,
}

/// Compute keep (`true`) / discard (`false`) for every entity.
///
/// Only projectile-vs-enemy pairs collide; both members of a colliding
/// pair are discarded.
pub fn resolve_collisions(entities: &[Entity], policy: CollisionPolicy) -> Vec<bool> {
    let mut keep = vec![true; entities.len()];

    for (i, a) in entities.iter().enumerate() {
        if !keep[i] {
            let skip = match policy {
                CollisionPolicy::Reference => !a.is_projectile(),
                CollisionPolicy::Symmetric => true,
            };
            if skip {
                continue;
            }
        }

        for (j, b) in entities.iter().enumerate().skip(i + 1) {
            if a.is_projectile() != b.is_projectile() && a.intersects(b) {
                keep[i] = false;
                keep[j] = false;
            }
        }
    }

    keep
}

/// Camera matrices handed to the renderer each frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraMatrices {
    pub projection: Mat4,
    pub view: Mat4,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub dt: f32,
    pub removed: usize,
    pub enemies_destroyed: usize,
    pub fired: bool,
    pub spawned: bool,
}

/// Live entity counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub enemies: usize,
    pub projectiles: usize,
}

pub struct Scene {
    entities: Vec<Entity>,
    pub player: Player,
    spawner: EnemySpawner,
    policy: CollisionPolicy,
    far_plane: f32,
    previous_time: f64,
}

impl Scene {
    /// `now` is the platform time the scene starts at.
    pub fn new(
        player: Player,
        spawner: EnemySpawner,
        policy: CollisionPolicy,
        far_plane: f32,
        now: f64,
    ) -> Self {
        Self {
            entities: Vec::new(),
            player,
            spawner,
            policy,
            far_plane,
            previous_time: now,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn stats(&self) -> SceneStats {
        let entities = self.entities();
        let projectiles = entities.iter().filter(|e| e.is_projectile()).count();
        SceneStats {
            enemies: entities.len() - projectiles,
            projectiles,
        }
    }

    /// Advance the simulation by one frame (steps 1–6).
    pub fn tick(
        &mut self,
        platform: &mut impl Platform,
        assets: &mut impl AssetServer,
    ) -> Result<TickReport, AssetError> {
        let now = platform.now();
        let dt = (now - self.previous_time) as f32;
        self.previous_time = now;

        for entity in &mut self.entities {
            entity.advance(dt);
        }

        let mut report = TickReport {
            dt,
            ..TickReport::default()
        };

        let keep = resolve_collisions(&self.entities, self.policy);
        if keep.contains(&false) {
            let previous = std::mem::take(&mut self.entities);
            for (entity, keep) in previous.into_iter().zip(keep) {
                if keep {
                    self.entities.push(entity);
                } else {
                    report.removed += 1;
                    if !entity.is_projectile() {
                        report.enemies_destroyed += 1;
                    }
                    entity.destroy(assets);
                }
            }
            log::debug!(
                "collision pass removed {} entities ({} enemies)",
                report.removed,
                report.enemies_destroyed
            );
        }

        if let Some(projectile) = self.player.update(platform, assets)? {
            self.spawn(projectile);
            report.fired = true;
        }

        if let Some(enemy) = self.spawner.update(now, self.player.position(), assets)? {
            self.spawn(enemy);
            report.spawned = true;
        }

        Ok(report)
    }

    /// Projection and view from the player's camera.
    pub fn camera_matrices(&self, aspect: f32) -> CameraMatrices {
        let camera = &self.player.camera;
        CameraMatrices {
            projection: camera.projection_matrix(
                aspect,
                self.player.collider_radius(),
                self.far_plane,
            ),
            view: camera.view_matrix(self.player.position()),
        }
    }

    /// Hand the camera and every live entity to the renderer (step 7).
    pub fn render(&self, target: &mut impl DrawTarget, aspect: f32) -> CameraMatrices {
        let matrices = self.camera_matrices(aspect);
        for entity in &self.entities {
            entity.draw(target);
        }
        matrices
    }

    /// Destroy every remaining entity. Returns how many were released.
    pub fn shutdown(&mut self, assets: &mut impl AssetServer) -> usize {
        let count = self.entities.len();
        for entity in self.entities.drain(..) {
            entity.destroy(assets);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entity::tests::{enemy_at, projectile_at, CountingAssets};
    use crate::engine::mesh::TextureHandle;
    use crate::engine::player::tests::ScriptedPlatform;
    use crate::engine::player::PlayerSettings;
    use crate::engine::spawner::SpawnerSettings;
    use glam::{Vec2, Vec3};

    /// Spawner that never fires during a test run.
    fn idle_spawner() -> EnemySpawner {
        EnemySpawner::new(SpawnerSettings::default(), 0, f64::INFINITY)
    }

    fn scene(policy: CollisionPolicy) -> Scene {
        Scene::new(
            Player::new(PlayerSettings::default(), 0.0),
            idle_spawner(),
            policy,
            300.0,
            0.0,
        )
    }

    #[derive(Default)]
    struct RecordingTarget {
        draws: Vec<(usize, u32, Mat4)>,
    }

    impl DrawTarget for RecordingTarget {
        fn draw(&mut self, positions: &[Vec3], uvs: &[Vec2], texture: &TextureHandle, model: Mat4) {
            assert_eq!(positions.len(), uvs.len());
            self.draws.push((positions.len(), texture.id(), model));
        }
    }

    #[test]
    fn projectile_and_enemy_in_contact_are_both_removed() {
        let mut assets = CountingAssets::default();
        let mut platform = ScriptedPlatform::new();
        let mut scene = scene(CollisionPolicy::Reference);

        scene.spawn(enemy_at(&mut assets, Vec3::ZERO, 2.0));
        scene.spawn(projectile_at(&mut assets, Vec3::new(1.5, 0.0, 0.0), -Vec3::X, 1.0));

        // Same timestamp as scene start: dt = 0, only the collision pass acts.
        let report = scene.tick(&mut platform, &mut assets).unwrap();
        assert!(scene.entities().is_empty());
        assert_eq!(report.removed, 2);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(assets.releases.len(), 2);
        assert!(assets.live.is_empty());
    }

    #[test]
    fn enemies_never_collide_with_each_other() {
        let mut assets = CountingAssets::default();
        let keep_a = enemy_at(&mut assets, Vec3::ZERO, 2.0);
        let keep_b = enemy_at(&mut assets, Vec3::new(1.0, 0.0, 0.0), 2.0);
        let keep = resolve_collisions(&[keep_a, keep_b], CollisionPolicy::Reference);
        assert_eq!(keep, vec![true, true]);
    }

    #[test]
    fn projectiles_never_collide_with_each_other() {
        let mut assets = CountingAssets::default();
        let a = projectile_at(&mut assets, Vec3::ZERO, Vec3::Z, 1.0);
        let b = projectile_at(&mut assets, Vec3::ZERO, Vec3::Z, 1.0);
        assert_eq!(resolve_collisions(&[a, b], CollisionPolicy::Symmetric), vec![true, true]);
    }

    #[test]
    fn touching_spheres_survive() {
        let mut assets = CountingAssets::default();
        let e = enemy_at(&mut assets, Vec3::ZERO, 2.0);
        let p = projectile_at(&mut assets, Vec3::new(3.0, 0.0, 0.0), Vec3::Z, 1.0);
        assert_eq!(resolve_collisions(&[e, p], CollisionPolicy::Reference), vec![true, true]);
    }

    #[test]
    fn one_projectile_can_take_out_several_enemies() {
        let mut assets = CountingAssets::default();
        let entities = [
            projectile_at(&mut assets, Vec3::ZERO, Vec3::Z, 1.0),
            enemy_at(&mut assets, Vec3::new(0.5, 0.0, 0.0), 1.0),
            enemy_at(&mut assets, Vec3::new(-0.5, 0.0, 0.0), 1.0),
        ];
        let keep = resolve_collisions(&entities, CollisionPolicy::Reference);
        assert_eq!(keep, vec![false, false, false]);
    }

    #[test]
    fn marked_enemy_is_skipped_as_first_operand_only() {
        // p0 hits e1; e1 (marked) would hit p2, but is skipped as first
        // operand. p2 survives under both policies.
        let mut assets = CountingAssets::default();
        let entities = [
            projectile_at(&mut assets, Vec3::new(-1.0, 0.0, 0.0), Vec3::Z, 0.5),
            enemy_at(&mut assets, Vec3::ZERO, 1.0),
            projectile_at(&mut assets, Vec3::new(1.0, 0.0, 0.0), Vec3::Z, 0.5),
        ];
        assert_eq!(
            resolve_collisions(&entities, CollisionPolicy::Reference),
            vec![false, false, true]
        );
        assert_eq!(
            resolve_collisions(&entities, CollisionPolicy::Symmetric),
            vec![false, false, true]
        );
    }

    #[test]
    fn policies_differ_on_a_marked_projectile() {
        // p0 is marked by e1, then would also hit e2 (as first operand).
        let mut assets = CountingAssets::default();
        let entities = [
            projectile_at(&mut assets, Vec3::ZERO, Vec3::Z, 1.0),
            enemy_at(&mut assets, Vec3::new(1.0, 0.0, 0.0), 0.5),
            enemy_at(&mut assets, Vec3::new(-1.0, 0.0, 0.0), 0.5),
        ];
        // The outer loop over p0 runs before p0 is marked, so both enemies
        // are hit under both policies.
        assert_eq!(
            resolve_collisions(&entities, CollisionPolicy::Reference),
            vec![false, false, false]
        );
        assert_eq!(
            resolve_collisions(&entities, CollisionPolicy::Symmetric),
            vec![false, false, false]
        );

        // e0 marks p1 as second operand; p1 then only reaches e2 as first operand.
        let entities = [
            enemy_at(&mut assets, Vec3::new(-1.0, 0.0, 0.0), 0.5),
            projectile_at(&mut assets, Vec3::ZERO, Vec3::Z, 1.0),
            enemy_at(&mut assets, Vec3::new(1.0, 0.0, 0.0), 0.5),
        ];
        assert_eq!(
            resolve_collisions(&entities, CollisionPolicy::Reference),
            vec![false, false, false]
        );
        assert_eq!(
            resolve_collisions(&entities, CollisionPolicy::Symmetric),
            vec![false, false, true]
        );
    }

    #[test]
    fn marked_enemy_is_still_hit_as_second_operand() {
        // p0 marks e2; p1 then reaches the already-marked e2 as second operand.
        let mut assets = CountingAssets::default();
        let entities = [
            projectile_at(&mut assets, Vec3::new(-0.5, 0.0, 0.0), Vec3::Z, 0.5),
            projectile_at(&mut assets, Vec3::new(0.5, 0.0, 0.0), Vec3::Z, 0.5),
            enemy_at(&mut assets, Vec3::ZERO, 1.0),
        ];
        for policy in [CollisionPolicy::Reference, CollisionPolicy::Symmetric] {
            assert_eq!(
                resolve_collisions(&entities, policy),
                vec![false, false, false],
                "{policy:?}"
            );
        }
    }

    #[test]
    fn motion_uses_elapsed_time() {
        let mut assets = CountingAssets::default();
        let mut platform = ScriptedPlatform::new();
        let mut scene = scene(CollisionPolicy::Reference);
        scene.spawn(projectile_at(&mut assets, Vec3::ZERO, Vec3::X, 0.5));

        platform.time = 0.5;
        let report = scene.tick(&mut platform, &mut assets).unwrap();
        assert_eq!(report.dt, 0.5);
        assert_eq!(scene.entities()[0].position, Vec3::new(6.5, 0.0, 0.0));

        platform.time = 0.75;
        scene.tick(&mut platform, &mut assets).unwrap();
        assert_eq!(scene.entities()[0].position, Vec3::new(9.75, 0.0, 0.0));
    }

    #[test]
    fn survivors_keep_their_order() {
        let mut assets = CountingAssets::default();
        let mut platform = ScriptedPlatform::new();
        let mut scene = scene(CollisionPolicy::Reference);
        scene.spawn(enemy_at(&mut assets, Vec3::new(100.0, 0.0, 0.0), 1.0));
        scene.spawn(enemy_at(&mut assets, Vec3::ZERO, 1.0));
        scene.spawn(projectile_at(&mut assets, Vec3::new(0.5, 0.0, 0.0), Vec3::Z, 0.5));
        scene.spawn(projectile_at(&mut assets, Vec3::new(-100.0, 0.0, 0.0), Vec3::Z, 0.5));

        scene.tick(&mut platform, &mut assets).unwrap();
        let xs: Vec<f32> = scene.entities().iter().map(|e| e.position.x).collect();
        assert_eq!(xs, vec![100.0, -100.0]);
    }

    #[test]
    fn empty_tick_is_idempotent() {
        let mut assets = CountingAssets::default();
        let mut platform = ScriptedPlatform::new();
        let mut scene = scene(CollisionPolicy::Reference);

        for step in 1..10 {
            platform.time = step as f64 * 0.1;
            let report = scene.tick(&mut platform, &mut assets).unwrap();
            assert!(!report.fired && !report.spawned);
            assert_eq!(report.removed, 0);
        }
        assert!(scene.entities().is_empty());
        assert!(assets.releases.is_empty());
        assert_eq!(assets.loads, 0);
    }

    #[test]
    fn fire_and_spawn_append_after_pruning() {
        let mut assets = CountingAssets::default();
        let mut platform = ScriptedPlatform::new();
        let mut scene = Scene::new(
            Player::new(PlayerSettings::default(), 0.0),
            EnemySpawner::new(SpawnerSettings::default(), 5, 0.0),
            CollisionPolicy::Reference,
            300.0,
            0.0,
        );
        platform.fire = true;

        let report = scene.tick(&mut platform, &mut assets).unwrap();
        assert!(report.fired && report.spawned);
        let kinds: Vec<bool> = scene.entities().iter().map(Entity::is_projectile).collect();
        assert_eq!(kinds, vec![true, false]);
        assert_eq!(scene.stats(), SceneStats { enemies: 1, projectiles: 1 });
    }

    #[test]
    fn render_hands_every_entity_to_the_target() {
        let mut assets = CountingAssets::default();
        let mut scene = scene(CollisionPolicy::Reference);
        scene.spawn(enemy_at(&mut assets, Vec3::new(0.0, 0.0, 10.0), 1.0));
        scene.spawn(projectile_at(&mut assets, Vec3::new(0.0, 0.0, 3.0), Vec3::Z, 0.75));

        let mut target = RecordingTarget::default();
        let matrices = scene.render(&mut target, 4.0 / 3.0);
        assert_eq!(target.draws.len(), 2);
        assert_eq!(target.draws[0].2, Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)));
        assert_eq!(target.draws[1].0, 15 * 15 * 6 - 2 * 15 * 3);

        // The enemy ahead of the player lands inside the clip volume.
        let clip = matrices.projection * matrices.view * Vec3::new(0.0, 0.0, 10.0).extend(1.0);
        assert!(clip.w > 0.0);
        assert!((clip.z / clip.w) > 0.0 && (clip.z / clip.w) < 1.0);
    }

    #[test]
    fn shutdown_releases_everything_once() {
        let mut assets = CountingAssets::default();
        let mut scene = scene(CollisionPolicy::Reference);
        scene.spawn(enemy_at(&mut assets, Vec3::ZERO, 1.0));
        scene.spawn(projectile_at(&mut assets, Vec3::new(50.0, 0.0, 0.0), Vec3::Z, 1.0));

        assert_eq!(scene.shutdown(&mut assets), 2);
        assert!(scene.entities().is_empty());
        assert!(assets.live.is_empty());
        assert_eq!(scene.shutdown(&mut assets), 0);
    }
}
