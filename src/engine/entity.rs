// Dynamic scene entities: enemies and projectiles.
//
// One struct for both kinds; `EntityKind` decides the collision rules.
// Geometry is object-local, `position` is applied at draw time.

use std::path::Path;

use glam::{Mat4, Vec3};
use super::assets::{AssetError, AssetServer};
use super::mesh::Model;
use super::renderer::DrawTarget;
use super::sphere::generate_sphere;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Enemy,
    Projectile,
}

/// Projectile construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileShape {
    /// Collider radius, also the radius of the generated sphere.
    pub radius: f32,
    pub sectors: u32,
    pub stacks: u32,
    pub speed: f32,
}

impl Default for ProjectileShape {
    fn default() -> Self {
        Self {
            radius: 0.75,
            sectors: 15,
            stacks: 15,
            speed: 13.0,
        }
    }
}

/// Random placement drawn by the enemy spawner.
#[derive(Debug, Clone, Copy)]
pub struct EnemyPlacement {
    pub position: Vec3,
    /// Unit rotation axis.
    pub axis: Vec3,
    /// Rotation angle in radians.
    pub angle: f32,
    /// Uniform scale applied to the mesh and the collider.
    pub scale: f32,
}

#[derive(Debug)]
pub struct Entity {
    pub position: Vec3,
    direction: Vec3,
    speed: f32,
    collider_radius: f32,
    kind: EntityKind,
    model: Model,
}

impl Entity {
    pub fn new(
        kind: EntityKind,
        position: Vec3,
        direction: Vec3,
        speed: f32,
        collider_radius: f32,
        model: Model,
    ) -> Self {
        debug_assert!(collider_radius > 0.0, "collider radius must be positive");
        debug_assert!(speed >= 0.0, "speed must be non-negative");
        Self {
            position,
            direction,
            speed,
            collider_radius,
            kind,
            model,
        }
    }

    /// Stationary enemy built from the cube mesh at `mesh_path`.
    ///
    /// The mesh is scaled then rotated once here; the collider radius is
    /// `base_radius * placement.scale`.
    pub fn enemy(
        assets: &mut impl AssetServer,
        mesh_path: &Path,
        texture_path: &Path,
        base_radius: f32,
        placement: EnemyPlacement,
    ) -> Result<Self, AssetError> {
        let mut mesh = assets.load_mesh(mesh_path)?;
        let axis = placement.axis.try_normalize().unwrap_or(Vec3::X);
        let bake = Mat4::from_scale(Vec3::splat(placement.scale))
            * Mat4::from_axis_angle(axis, placement.angle);
        mesh.transform(bake);

        let texture = assets.load_texture(texture_path)?;
        Ok(Self::new(
            EntityKind::Enemy,
            placement.position,
            Vec3::ZERO,
            0.0,
            base_radius * placement.scale,
            Model::new(mesh, texture),
        ))
    }

    /// Projectile travelling along `direction` with a freshly generated sphere mesh.
    pub fn projectile(
        assets: &mut impl AssetServer,
        texture_path: &Path,
        position: Vec3,
        direction: Vec3,
        shape: ProjectileShape,
    ) -> Result<Self, AssetError> {
        let mesh = generate_sphere(shape.radius, shape.sectors, shape.stacks, Vec3::ZERO);
        let texture = assets.load_texture(texture_path)?;
        Ok(Self::new(
            EntityKind::Projectile,
            position,
            direction,
            shape.speed,
            shape.radius,
            Model::new(mesh, texture),
        ))
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_projectile(&self) -> bool {
        self.kind() == EntityKind::Projectile
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn collider_radius(&self) -> f32 {
        self.collider_radius
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Strict sphere overlap: touching spheres do not intersect.
    pub fn intersects(&self, other: &Entity) -> bool {
        spheres_intersect(
            self.position,
            self.collider_radius(),
            other.position,
            other.collider_radius(),
        )
    }

    /// No bounds: entities may travel arbitrarily far.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Advance along the travel direction for `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.translate(self.direction() * self.speed() * dt);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }

    pub fn draw(&self, target: &mut impl DrawTarget) {
        self.model().draw(target, self.model_matrix());
    }

    /// Release the entity's resources. Consumes it, so it happens once.
    pub fn destroy(self, assets: &mut impl AssetServer) {
        assets.release_texture(self.model.into_texture());
    }
}

/// `true` iff the distance between centres is strictly below `r1 + r2`.
pub fn spheres_intersect(c1: Vec3, r1: f32, c2: Vec3, r2: f32) -> bool {
    c1.distance(c2) < r1 + r2
}
