// Game configuration: TOML file plus command-line overrides.
//
// Every section falls back to its defaults, so a config file only needs the
// keys it changes:
//
//   [spawner]
//   delay = 1.5
//
//   [simulation]
//   collision_policy = "symmetric"

use std::path::{Path, PathBuf};

use clap::Parser;
use glam::{DVec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::engine::entity::ProjectileShape;
use crate::engine::player::PlayerSettings;
use crate::engine::scene::CollisionPolicy;
use crate::engine::spawner::SpawnerSettings;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Snowball shooter: shoot the spinning cubes before they pile up.
#[derive(Parser, Debug, Default)]
#[command(name = "snowball_shooter", version, about)]
pub struct Cli {
    /// TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding meshes and textures.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Spawner seed. Random when absent.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip already-hit entities of either kind in later collision checks.
    #[arg(long)]
    pub symmetric_collisions: bool,

    /// Debug logging (RUST_LOG still wins when set).
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Shooter".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub position: [f32; 3],
    pub collider_radius: f32,
    pub mouse_sensitivity: f32,
    /// Seconds between shots while fire is held.
    pub fire_delay: f64,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub muzzle_offset: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let player = PlayerSettings::default();
        Self {
            position: player.position.to_array(),
            collider_radius: player.collider_radius,
            mouse_sensitivity: player.mouse_sensitivity,
            fire_delay: player.fire_delay,
            fov: player.fov,
            muzzle_offset: player.muzzle_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f32,
    pub sectors: u32,
    pub stacks: u32,
    pub speed: f32,
    pub texture: PathBuf,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        let shape = ProjectileShape::default();
        Self {
            radius: shape.radius,
            sectors: shape.sectors,
            stacks: shape.stacks,
            speed: shape.speed,
            texture: PlayerSettings::default().projectile_texture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub delay: f64,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub base_collider_radius: f32,
    pub mesh: PathBuf,
    pub texture: PathBuf,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        let s = SpawnerSettings::default();
        Self {
            delay: s.delay,
            min_radius: s.min_radius,
            max_radius: s.max_radius,
            min_size: s.min_size,
            max_size: s.max_size,
            base_collider_radius: s.base_collider_radius,
            mesh: s.mesh,
            texture: s.texture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub collision_policy: CollisionPolicy,
    pub far_plane: f32,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::default(),
            far_plane: 300.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub assets_dir: PathBuf,
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub projectile: ProjectileConfig,
    pub spawner: SpawnerConfig,
    pub simulation: SimulationConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            window: WindowConfig::default(),
            player: PlayerConfig::default(),
            projectile: ProjectileConfig::default(),
            spawner: SpawnerConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents, path)?;
        config.validate()?;
        Ok(config)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Command-line values win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(assets) = &cli.assets {
            self.assets_dir = assets.clone();
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = Some(seed);
        }
        if cli.symmetric_collisions {
            self.simulation.collision_policy = CollisionPolicy::Symmetric;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero");
        }
        if self.player.collider_radius <= 0.0 {
            return invalid("player.collider_radius must be positive");
        }
        if self.simulation.far_plane <= self.player.collider_radius {
            return invalid("simulation.far_plane must exceed player.collider_radius");
        }
        if self.projectile.radius <= 0.0 || self.projectile.speed < 0.0 {
            return invalid("projectile radius must be positive and speed non-negative");
        }
        if self.spawner.min_radius > self.spawner.max_radius {
            return invalid("spawner.min_radius exceeds spawner.max_radius");
        }
        if self.spawner.min_size <= 0.0 || self.spawner.min_size > self.spawner.max_size {
            return invalid("spawner size range must be positive and ordered");
        }
        if self.spawner.base_collider_radius <= 0.0 {
            return invalid("spawner.base_collider_radius must be positive");
        }
        if self.player.fire_delay < 0.0 || self.spawner.delay < 0.0 {
            return invalid("delays must be non-negative");
        }
        Ok(())
    }

    /// `pointer_anchor` is the window centre the look pointer recentres to.
    pub fn player_settings(&self, pointer_anchor: DVec2) -> PlayerSettings {
        let p = &self.player;
        let proj = &self.projectile;
        PlayerSettings {
            position: Vec3::from_array(p.position),
            collider_radius: p.collider_radius,
            mouse_sensitivity: p.mouse_sensitivity,
            fire_delay: p.fire_delay,
            fov: p.fov,
            muzzle_offset: p.muzzle_offset,
            pointer_anchor,
            projectile: ProjectileShape {
                radius: proj.radius,
                sectors: proj.sectors,
                stacks: proj.stacks,
                speed: proj.speed,
            },
            projectile_texture: proj.texture.clone(),
        }
    }

    pub fn spawner_settings(&self) -> SpawnerSettings {
        let s = &self.spawner;
        SpawnerSettings {
            delay: s.delay,
            min_radius: s.min_radius,
            max_radius: s.max_radius,
            min_size: s.min_size,
            max_size: s.max_size,
            base_collider_radius: s.base_collider_radius,
            mesh: s.mesh.clone(),
            texture: s.texture.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<GameConfig, ConfigError> {
        GameConfig::from_toml(contents, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.simulation.collision_policy, CollisionPolicy::Reference);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [spawner]
            delay = 1.5

            [simulation]
            collision_policy = "symmetric"
            "#,
        )
        .unwrap();
        assert_eq!(config.spawner.delay, 1.5);
        assert_eq!(config.spawner.max_radius, 50.0);
        assert_eq!(config.simulation.collision_policy, CollisionPolicy::Symmetric);
        assert_eq!(config.simulation.far_plane, 300.0);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(parse("[window\nwidth = 3"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            parse("[simulation]\ncollision_policy = \"sideways\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = GameConfig::load(Path::new("definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn cli_overrides_file() {
        let mut config = parse("[simulation]\nseed = 4").unwrap();
        let cli = Cli {
            assets: Some(PathBuf::from("/tmp/assets")),
            seed: Some(99),
            symmetric_collisions: true,
            ..Cli::default()
        };
        config.apply_cli(&cli);
        assert_eq!(config.assets_dir, PathBuf::from("/tmp/assets"));
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.simulation.collision_policy, CollisionPolicy::Symmetric);
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::try_parse_from([
            "snowball_shooter",
            "--seed",
            "7",
            "--symmetric-collisions",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(7));
        assert!(cli.symmetric_collisions);
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn validation_rejects_inverted_ranges() {
        let mut config = GameConfig::default();
        config.spawner.min_radius = 60.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.simulation.far_plane = 0.5;
        assert!(config.validate().is_err());

        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn settings_carry_config_values() {
        let mut config = GameConfig::default();
        config.projectile.speed = 20.0;
        config.spawner.delay = 0.5;
        let player = config.player_settings(DVec2::new(400.0, 300.0));
        assert_eq!(player.projectile.speed, 20.0);
        assert_eq!(player.pointer_anchor, DVec2::new(400.0, 300.0));
        assert_eq!(player.projectile_texture, PathBuf::from("ice_texture.bmp"));
        assert_eq!(config.spawner_settings().delay, 0.5);
    }
}
