// Asset loading: textures and Wavefront OBJ meshes.
//
// The simulation only sees the `AssetServer` trait. The GPU renderer is the
// production implementation; tests plug in counting doubles.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use super::mesh::{MeshData, TextureHandle};

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Obj {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{0} contains no triangles")]
    EmptyMesh(PathBuf),

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Texture and mesh loading service used while constructing entities.
pub trait AssetServer {
    /// Load (or share) the texture at `path`. Every successful call must be
    /// paired with exactly one `release_texture`.
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, AssetError>;

    fn release_texture(&mut self, handle: TextureHandle);

    fn load_mesh(&mut self, path: &Path) -> Result<MeshData, AssetError> {
        load_obj(path)
    }
}

// ============================================================================
// TEXTURE IMAGES
// ============================================================================

/// Decoded RGBA8 pixels, top row first.
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode an image file (BMP) into RGBA8.
pub fn load_texture_image(path: &Path) -> Result<TextureImage, AssetError> {
    let decoded = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => AssetError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let rgba = decoded.to_rgba8();
    Ok(TextureImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

// ============================================================================
// OBJ LOADING
// ============================================================================

/// Load a Wavefront OBJ file as a flat triangle list.
pub fn load_obj(path: &Path) -> Result<MeshData, AssetError> {
    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(BufReader::new(file), path)?;
    log::debug!("loaded {}: {} vertices", path.display(), mesh.vertex_count());
    Ok(mesh)
}

/// Parse OBJ text. Supports `v`, `vt`, `vn` and `f` (any polygon size, fan
/// triangulated; `v`, `v/vt`, `v//vn`, `v/vt/vn`; negative indices are
/// relative to the end of the list). Other statements are ignored.
/// `path` is only used for error messages.
pub fn parse_obj(reader: impl BufRead, path: &Path) -> Result<MeshData, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut mesh = MeshData::default();
    let mut has_normals = true;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let err = |message: String| AssetError::Obj {
            path: path.to_path_buf(),
            line: line_no,
            message,
        };

        let line = line.map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else { continue };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "v" => positions.push(parse_vec3(&args).map_err(err)?),
            "vn" => normals.push(parse_vec3(&args).map_err(err)?),
            "vt" => {
                let v = parse_floats::<2>(&args).map_err(err)?;
                uvs.push(Vec2::new(v[0], v[1]));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(err(format!("face needs 3 vertices, got {}", args.len())));
                }
                let corners = args
                    .iter()
                    .map(|corner| parse_corner(corner, positions.len(), uvs.len(), normals.len()))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(err)?;

                for i in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[i], corners[i + 1]] {
                        mesh.positions.push(positions[corner.position]);
                        mesh.uvs.push(corner.uv.map_or(Vec2::ZERO, |t| uvs[t]));
                        match corner.normal {
                            Some(n) => mesh.normals.push(normals[n]),
                            None => has_normals = false,
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if mesh.is_empty() {
        return Err(AssetError::EmptyMesh(path.to_path_buf()));
    }
    if !has_normals {
        mesh.normals.clear();
    }
    Ok(mesh)
}

#[derive(Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

fn parse_corner(corner: &str, n_pos: usize, n_uv: usize, n_norm: usize) -> Result<Corner, String> {
    let mut fields = corner.split('/');
    let position = match fields.next() {
        Some(field) if !field.is_empty() => resolve_index(field, n_pos)?,
        _ => return Err(format!("face corner `{corner}` has no position")),
    };
    let uv = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, n_uv)?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(field) if !field.is_empty() => Some(resolve_index(field, n_norm)?),
        _ => None,
    };
    Ok(Corner { position, uv, normal })
}

// OBJ indices are 1-based; negative values count back from the latest element.
fn resolve_index(field: &str, len: usize) -> Result<usize, String> {
    let raw: i64 = field
        .parse()
        .map_err(|_| format!("invalid index `{field}`"))?;
    let resolved = if raw > 0 {
        raw - 1
    } else {
        len as i64 + raw
    };
    if raw == 0 || resolved < 0 || resolved >= len as i64 {
        return Err(format!("index {raw} out of range (have {len})"));
    }
    Ok(resolved as usize)
}

fn parse_floats<const N: usize>(args: &[&str]) -> Result<[f32; N], String> {
    if args.len() < N {
        return Err(format!("expected {N} numbers, got {}", args.len()));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| format!("invalid number `{arg}`"))?;
    }
    Ok(out)
}

fn parse_vec3(args: &[&str]) -> Result<Vec3, String> {
    parse_floats::<3>(args).map(Vec3::from_array)
}
