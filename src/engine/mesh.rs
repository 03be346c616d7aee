// Mesh data and renderable models.
//
//   load_obj()/generate_sphere() → MeshData → Model (+ texture) → DrawTarget → GPU
//
// Geometry is stored as a flat triangle list (no index buffer): every three
// consecutive positions form one triangle. Positions are object-local; the
// world transform is supplied at draw time.

use glam::{Mat4, Vec2, Vec3};
use super::renderer::DrawTarget;

// ============================================================================
// TEXTURE HANDLE
// ============================================================================

/// Opaque reference to a texture owned by an `AssetServer`.
///
/// Acquired with `AssetServer::load_texture`, given back with
/// `AssetServer::release_texture`. Not `Clone`: one release per acquisition.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

// ============================================================================
// MESH DATA
// ============================================================================

/// CPU-side triangle-list geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    /// Cosmetic only, the shader ignores them. May be empty.
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bake `transform` into the geometry. Normals are transformed as
    /// directions (w = 0) and renormalized.
    pub fn transform(&mut self, transform: Mat4) {
        for p in &mut self.positions {
            *p = transform.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = transform.transform_vector3(*n).normalize_or_zero();
        }
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// Geometry plus the texture it is drawn with.
#[derive(Debug)]
pub struct Model {
    mesh: MeshData,
    texture: TextureHandle,
}

impl Model {
    pub fn new(mesh: MeshData, texture: TextureHandle) -> Self {
        Self { mesh, texture }
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Submit one triangle-list draw with the given model matrix.
    pub fn draw(&self, target: &mut impl DrawTarget, model_matrix: Mat4) {
        let mesh = self.mesh();
        target.draw(&mesh.positions, &mesh.uvs, &self.texture, model_matrix);
    }

    /// Give up the texture handle so the owner can release it.
    pub fn into_texture(self) -> TextureHandle {
        self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        }
    }

    #[test]
    fn transform_moves_positions_but_not_normal_length() {
        let mut mesh = triangle();
        mesh.transform(Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(mesh.positions[1], Vec3::new(2.0, 0.0, 0.0));
        assert_abs_diff_eq!(mesh.normals[0].length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn translation_does_not_touch_normals() {
        let mut mesh = triangle();
        mesh.transform(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(mesh.positions[0], Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(mesh.normals[0], Vec3::Z);
        assert_eq!(mesh.uvs[1], Vec2::X);
    }

    #[test]
    fn model_hands_back_its_texture() {
        let model = Model::new(triangle(), TextureHandle::new(7));
        assert_eq!(model.mesh().vertex_count(), 3);
        assert_eq!(model.into_texture().id(), 7);
    }
}
