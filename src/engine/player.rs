// First-person player: mouse look plus rate-limited projectile firing.

use std::path::PathBuf;

use glam::{DVec2, Vec3};
use super::assets::{AssetError, AssetServer};
use super::camera::FpsCamera;
use super::entity::{Entity, ProjectileShape};
use super::input::Platform;

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub position: Vec3,
    pub collider_radius: f32,
    /// Radians per pointer pixel.
    pub mouse_sensitivity: f32,
    /// Minimum seconds between two shots.
    pub fire_delay: f64,
    pub fov: f32,
    /// Projectiles spawn this far along the look direction.
    pub muzzle_offset: f32,
    /// Point the pointer is recentred to after every read.
    pub pointer_anchor: DVec2,
    pub projectile: ProjectileShape,
    pub projectile_texture: PathBuf,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            collider_radius: 1.0,
            mouse_sensitivity: 0.005,
            fire_delay: 0.2,
            fov: 45.0,
            muzzle_offset: 1.5,
            pointer_anchor: DVec2::new(512.0, 384.0),
            projectile: ProjectileShape::default(),
            projectile_texture: PathBuf::from("ice_texture.bmp"),
        }
    }
}

pub struct Player {
    pub camera: FpsCamera,
    settings: PlayerSettings,
    /// Earliest time the next shot may be fired.
    next_fire_at: f64,
}

impl Player {
    /// `now` is the platform time at creation: the first shot is available immediately.
    pub fn new(settings: PlayerSettings, now: f64) -> Self {
        Self {
            camera: FpsCamera::new(0.0, 0.0, settings.fov),
            settings,
            next_fire_at: now,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.settings.position
    }

    pub fn collider_radius(&self) -> f32 {
        self.settings.collider_radius
    }

    /// Apply pointer movement since the last tick, then recentre the pointer.
    pub fn look(&mut self, platform: &mut impl Platform) {
        let anchor = self.settings.pointer_anchor;
        let delta = anchor - platform.cursor_position();
        platform.set_cursor_position(anchor);

        let sensitivity = self.settings.mouse_sensitivity;
        self.camera.horizontal_angle += sensitivity * delta.x as f32;
        self.camera.vertical_angle += sensitivity * delta.y as f32;
    }

    /// One controller tick: look, then fire if the trigger is held and the
    /// re-fire delay has elapsed.
    pub fn update(
        &mut self,
        platform: &mut impl Platform,
        assets: &mut impl AssetServer,
    ) -> Result<Option<Entity>, AssetError> {
        self.look(platform);

        if !platform.is_fire_held() {
            return Ok(None);
        }
        let now = platform.now();
        if now < self.next_fire_at {
            return Ok(None);
        }
        self.next_fire_at = now + self.settings.fire_delay;

        let direction = self.camera.direction();
        let projectile = Entity::projectile(
            assets,
            &self.settings.projectile_texture,
            self.settings.position + direction * self.settings.muzzle_offset,
            direction,
            self.settings.projectile,
        )?;
        log::debug!("fired projectile towards {direction:?}");
        Ok(Some(projectile))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::entity::tests::CountingAssets;
    use approx::assert_abs_diff_eq;

    /// Scripted platform with a manually advanced clock.
    pub(crate) struct ScriptedPlatform {
        pub time: f64,
        pub cursor: DVec2,
        pub fire: bool,
        pub recentres: usize,
    }

    impl ScriptedPlatform {
        pub(crate) fn new() -> Self {
            Self {
                time: 0.0,
                cursor: PlayerSettings::default().pointer_anchor,
                fire: false,
                recentres: 0,
            }
        }
    }

    impl Platform for ScriptedPlatform {
        fn now(&self) -> f64 {
            self.time
        }

        fn cursor_position(&self) -> DVec2 {
            self.cursor
        }

        fn set_cursor_position(&mut self, position: DVec2) {
            self.cursor = position;
            self.recentres += 1;
        }

        fn is_fire_held(&self) -> bool {
            self.fire
        }
    }

    #[test]
    fn pointer_delta_turns_camera_and_recentres() {
        let mut platform = ScriptedPlatform::new();
        let mut assets = CountingAssets::default();
        let mut player = Player::new(PlayerSettings::default(), 0.0);

        platform.cursor += DVec2::new(100.0, -20.0);
        let shot = player.update(&mut platform, &mut assets).unwrap();

        assert!(shot.is_none());
        assert_abs_diff_eq!(player.camera.horizontal_angle, -0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(player.camera.vertical_angle, 0.1, epsilon = 1e-6);
        assert_eq!(platform.cursor, PlayerSettings::default().pointer_anchor);
        assert_eq!(platform.recentres, 1);
    }

    #[test]
    fn shot_spawns_in_front_along_view() {
        let mut platform = ScriptedPlatform::new();
        let mut assets = CountingAssets::default();
        let mut player = Player::new(PlayerSettings::default(), 0.0);
        platform.fire = true;

        let shot = player.update(&mut platform, &mut assets).unwrap().unwrap();
        assert!(shot.is_projectile());
        assert_abs_diff_eq!(shot.position.z, 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(shot.direction().z, 1.0, epsilon = 1e-6);
        assert_eq!(assets.loads, 1);
    }

    #[test]
    fn holding_fire_is_rate_limited() {
        let mut platform = ScriptedPlatform::new();
        let mut assets = CountingAssets::default();
        let settings = PlayerSettings {
            fire_delay: 0.25,
            ..PlayerSettings::default()
        };
        let mut player = Player::new(settings, 0.0);
        platform.fire = true;

        // 4 seconds of held fire at 64 Hz.
        let ticks = 256;
        let mut shots = 0;
        for step in 0..ticks {
            platform.time = step as f64 / 64.0;
            if player.update(&mut platform, &mut assets).unwrap().is_some() {
                shots += 1;
            }
        }
        let expected = (4.0_f64 / 0.25).floor() as i64;
        assert!((shots as i64 - expected).abs() <= 1, "got {shots} shots");
    }

    #[test]
    fn releasing_fire_stops_shots() {
        let mut platform = ScriptedPlatform::new();
        let mut assets = CountingAssets::default();
        let mut player = Player::new(PlayerSettings::default(), 0.0);

        for step in 0..100 {
            platform.time = step as f64 * 0.1;
            assert!(player.update(&mut platform, &mut assets).unwrap().is_none());
        }
        assert_eq!(assets.loads, 0);
    }
}
