// UV sphere generation for projectile meshes.
//
// Grid of (stacks + 1) rings × (sectors + 1) points, stack angle running from
// +90° to −90° and sector angle from 0 to 360°. The seam column is duplicated
// so every point gets its own UV. Each grid quad becomes two triangles except
// the polar rows, which collapse to one triangle per sector:
//
//   triangle count = sectors * (2 * stacks − 2)
//   vertex count   = 6 * sectors * stacks − 6 * sectors

use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use super::mesh::MeshData;

/// Number of triangle-list vertices `generate_sphere` emits.
pub fn sphere_vertex_count(sectors: u32, stacks: u32) -> usize {
    let (sectors, stacks) = (sectors as usize, stacks as usize);
    (sectors * stacks * 6).saturating_sub(sectors * 6)
}

/// Build a triangulated sphere around `center`.
///
/// The poles sit on the Z axis. UV = (sector / sectors, stack / stacks), so
/// all texture coordinates fall in [0, 1]. Zero sectors or stacks yields an
/// empty mesh.
pub fn generate_sphere(radius: f32, sectors: u32, stacks: u32, center: Vec3) -> MeshData {
    if sectors == 0 || stacks == 0 {
        return MeshData::default();
    }

    let sector_step = TAU / sectors as f32;
    let stack_step = PI / stacks as f32;

    // Ring points, row-major by stack.
    let ring_len = sectors as usize + 1;
    let grid_len = (stacks as usize + 1) * ring_len;
    let mut points: Vec<Vec3> = Vec::with_capacity(grid_len);
    let mut normals: Vec<Vec3> = Vec::with_capacity(grid_len);
    let mut uvs: Vec<Vec2> = Vec::with_capacity(grid_len);

    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let local = Vec3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);

            points.push(center + local);
            // Directions ignore the translation.
            normals.push(if radius > 0.0 { local / radius } else { Vec3::ZERO });
            uvs.push(Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32));
        }
    }

    let mut mesh = MeshData {
        positions: Vec::with_capacity(sphere_vertex_count(sectors, stacks)),
        normals: Vec::with_capacity(sphere_vertex_count(sectors, stacks)),
        uvs: Vec::with_capacity(sphere_vertex_count(sectors, stacks)),
    };

    let mut emit = |tri: [usize; 3]| {
        for k in tri {
            mesh.positions.push(points[k]);
            mesh.normals.push(normals[k]);
            mesh.uvs.push(uvs[k]);
        }
    };

    for i in 0..stacks as usize {
        let row = i * ring_len;
        let next_row = row + ring_len;

        for j in 0..sectors as usize {
            let (k1, k2) = (row + j, next_row + j);

            // Top row: only the lower triangle exists.
            if i != 0 {
                emit([k1, k2, k1 + 1]);
            }
            // Bottom row: only the upper triangle exists.
            if i != stacks as usize - 1 {
                emit([k1 + 1, k2, k2 + 1]);
            }
        }
    }

    mesh
}
