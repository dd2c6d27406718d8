//! Asset parsing into platform-neutral data.
//!
//! The loaders themselves are opaque services: glTF via the `gltf` crate,
//! HDR environment maps and LDR textures via the `image` crate. This module
//! flattens a car model's node hierarchy into world-space primitives,
//! classifies bodywork for paint swaps, and provides the fallback ground
//! plane substituted when a model load fails.

use crate::fit::Aabb;
use glam::{Mat3, Mat4, Vec3};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF error: {0}")]
    Gltf(String),
    #[error("image decode error: {0}")]
    Image(String),
    #[error("model contains no usable mesh primitives")]
    EmptyModel,
}

/// One drawable primitive, flattened into world space.
#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    pub name: String,
    pub material_name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// Classified as paintable bodywork by name keywords.
    pub is_body: bool,
}

/// A parsed car model: primitives plus the overall bounding box.
#[derive(Debug, Clone)]
pub struct CarModel {
    pub primitives: Vec<MeshPrimitive>,
    pub aabb: Aabb,
}

impl CarModel {
    pub fn body_primitive_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_body).count()
    }
}

/// Bodywork detection, matching the original showcase's keyword sweep over
/// mesh and material names.
#[inline]
pub fn is_body_mesh(mesh_name: &str, material_name: &str) -> bool {
    let n = mesh_name.to_lowercase();
    let mn = material_name.to_lowercase();
    n.contains("body")
        || n.contains("paint")
        || n.contains("chassis")
        || n.contains("metal_primary")
        || mn.contains("paint")
        || mn.contains("body")
}

/// Parse a packed `.glb` (or buffer-embedded `.gltf`) from bytes.
pub fn parse_model(bytes: &[u8]) -> Result<CarModel, AssetError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| AssetError::Gltf(e.to_string()))?;
    let mut buffers = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffers.push(blob.to_vec()),
                None => return Err(AssetError::Gltf("missing binary blob".into())),
            },
            gltf::buffer::Source::Uri(_) => {
                return Err(AssetError::Gltf(
                    "external buffer URIs are not supported; pack the model as .glb".into(),
                ))
            }
        }
    }
    convert_document(&gltf, &buffers)
}

/// Load a model from disk, resolving external buffers (native frontend).
pub fn import_model(path: impl AsRef<Path>) -> Result<CarModel, AssetError> {
    let (doc, buffers, _images) =
        gltf::import(path.as_ref()).map_err(|e| AssetError::Gltf(e.to_string()))?;
    let buffers: Vec<Vec<u8>> = buffers.into_iter().map(|d| d.0).collect();
    convert_document(&doc, &buffers)
}

fn convert_document(doc: &gltf::Document, buffers: &[Vec<u8>]) -> Result<CarModel, AssetError> {
    let mut primitives = Vec::new();
    if let Some(scene) = doc.default_scene().or_else(|| doc.scenes().next()) {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, buffers, &mut primitives)?;
        }
    }
    let aabb = Aabb::from_points(
        primitives
            .iter()
            .flat_map(|p| p.positions.iter().map(|v| Vec3::from(*v))),
    )
    .ok_or(AssetError::EmptyModel)?;
    Ok(CarModel { primitives, aabb })
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<MeshPrimitive>,
) -> Result<(), AssetError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let name = node
            .name()
            .or_else(|| mesh.name())
            .unwrap_or("unnamed")
            .to_string();
        for prim in mesh.primitives() {
            if let Some(converted) = convert_primitive(&prim, &name, world, buffers)? {
                out.push(converted);
            }
        }
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out)?;
    }
    Ok(())
}

fn convert_primitive(
    prim: &gltf::Primitive,
    mesh_name: &str,
    world: Mat4,
    buffers: &[Vec<u8>],
) -> Result<Option<MeshPrimitive>, AssetError> {
    let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|d| d.as_slice()));

    let positions: Vec<[f32; 3]> = match reader.read_positions() {
        Some(iter) => iter
            .map(|p| world.transform_point3(Vec3::from(p)).to_array())
            .collect(),
        None => return Ok(None),
    };
    if positions.is_empty() {
        return Ok(None);
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        // No indices: treat the positions as a plain triangle list.
        None => (0..positions.len() as u32).collect(),
    };

    let normal_mat = Mat3::from_mat4(world).inverse().transpose();
    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(iter) => iter
            .map(|n| (normal_mat * Vec3::from(n)).normalize_or_zero().to_array())
            .collect(),
        None => smooth_normals(&positions, &indices),
    };

    let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(tex) => tex.into_f32().collect(),
        None => vec![[0.0, 0.0]; positions.len()],
    };

    let material = prim.material();
    let material_name = material.name().unwrap_or("").to_string();
    let pbr = material.pbr_metallic_roughness();

    let is_body = is_body_mesh(mesh_name, &material_name);
    Ok(Some(MeshPrimitive {
        name: mesh_name.to_string(),
        material_name,
        positions,
        normals,
        uvs,
        indices,
        base_color: pbr.base_color_factor(),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        is_body,
    }))
}

/// Area-weighted smooth normals for primitives that ship without them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from(positions[a]);
        let pb = Vec3::from(positions[b]);
        let pc = Vec3::from(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.normalize_or(Vec3::Y).to_array())
        .collect()
}

/// Flat two-triangle ground plane substituted when a model load fails and
/// the decor's policy asks for one.
pub fn fallback_ground_plane(half_extent: f32) -> MeshPrimitive {
    let h = half_extent;
    MeshPrimitive {
        name: "fallback_ground".into(),
        material_name: "fallback".into(),
        positions: vec![[-h, 0.0, -h], [h, 0.0, -h], [h, 0.0, h], [-h, 0.0, h]],
        normals: vec![[0.0, 1.0, 0.0]; 4],
        uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        indices: vec![0, 2, 1, 0, 3, 2],
        base_color: [0.25, 0.25, 0.27, 1.0],
        metallic: 0.0,
        roughness: 0.9,
        is_body: false,
    }
}

/// Equirectangular HDR environment image (RGB stored as RGBA f32).
#[derive(Debug, Clone)]
pub struct EnvironmentMap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 4]>,
}

/// Decode a Radiance `.hdr` panorama.
pub fn decode_environment(bytes: &[u8]) -> Result<EnvironmentMap, AssetError> {
    let decoder = image::codecs::hdr::HdrDecoder::new(Cursor::new(bytes))
        .map_err(|e| AssetError::Image(e.to_string()))?;
    let meta = decoder.metadata();
    let (width, height) = (meta.width, meta.height);
    let rgb = decoder
        .read_image_hdr()
        .map_err(|e| AssetError::Image(e.to_string()))?;
    let pixels = rgb.into_iter().map(|p| [p[0], p[1], p[2], 1.0]).collect();
    Ok(EnvironmentMap {
        width,
        height,
        pixels,
    })
}

/// Flat RGBA8 texture.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode an LDR image (ground color maps and the like).
pub fn decode_texture(bytes: &[u8]) -> Result<TextureData, AssetError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AssetError::Image(e.to_string()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(TextureData {
        width,
        height,
        rgba: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_classification_keywords() {
        assert!(is_body_mesh("Body_panel_left", ""));
        assert!(is_body_mesh("CHASSIS_low", ""));
        assert!(is_body_mesh("metal_primary_03", ""));
        assert!(is_body_mesh("doors", "CarPaint"));
        assert!(!is_body_mesh("wheel_fl", "rubber"));
        assert!(!is_body_mesh("glass_front", "windshield"));
    }

    #[test]
    fn smooth_normals_point_up_for_flat_fan() {
        let positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]];
        let indices = vec![0, 1, 2];
        let normals = smooth_normals(&positions, &indices);
        for n in normals {
            assert!(n[1] > 0.99, "expected +Y normal, got {n:?}");
        }
    }
}
