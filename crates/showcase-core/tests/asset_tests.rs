use showcase_core::asset::{
    decode_environment, decode_texture, fallback_ground_plane, parse_model, AssetError,
};

/// Pack a JSON chunk and a binary chunk into a minimal GLB container.
fn build_glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json_bytes = json.as_bytes().to_vec();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin_bytes = bin.to_vec();
    while bin_bytes.len() % 4 != 0 {
        bin_bytes.push(0);
    }
    let total = 12 + 8 + json_bytes.len() + 8 + bin_bytes.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&0x4654_6C67_u32.to_le_bytes()); // "glTF"
    out.extend_from_slice(&2_u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534A_u32.to_le_bytes()); // "JSON"
    out.extend_from_slice(&json_bytes);
    out.extend_from_slice(&(bin_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x004E_4942_u32.to_le_bytes()); // "BIN\0"
    out.extend_from_slice(&bin_bytes);
    out
}

fn triangle_glb(node_name: &str) -> Vec<u8> {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
    let mut bin = Vec::new();
    for p in positions {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    let json = format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": [{{"mesh": 0, "name": "{node_name}"}}],
  "meshes": [{{"name": "{node_name}", "primitives": [{{"attributes": {{"POSITION": 0}}}}]}}],
  "buffers": [{{"byteLength": {len}}}],
  "bufferViews": [{{"buffer": 0, "byteOffset": 0, "byteLength": {len}}}],
  "accessors": [{{
    "bufferView": 0, "byteOffset": 0, "componentType": 5126, "count": 3,
    "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [4.0, 2.0, 0.0]
  }}]
}}"#,
        len = bin.len()
    );
    build_glb(&json, &bin)
}

#[test]
fn parse_model_reads_a_packed_glb() {
    let model = parse_model(&triangle_glb("body_shell")).expect("valid GLB must parse");
    assert_eq!(model.primitives.len(), 1);
    let prim = &model.primitives[0];
    assert_eq!(prim.name, "body_shell");
    assert_eq!(prim.positions.len(), 3);
    assert_eq!(prim.indices, vec![0, 1, 2]);
    assert_eq!(model.aabb.largest_dimension(), 4.0);
}

#[test]
fn body_classification_uses_node_names() {
    let body = parse_model(&triangle_glb("body_shell")).unwrap();
    assert!(body.primitives[0].is_body);
    assert_eq!(body.body_primitive_count(), 1);

    let wheel = parse_model(&triangle_glb("wheel_fl")).unwrap();
    assert!(!wheel.primitives[0].is_body);
}

#[test]
fn missing_normals_are_reconstructed() {
    let model = parse_model(&triangle_glb("body_shell")).unwrap();
    // CCW triangle in the XY plane faces +Z.
    for n in &model.primitives[0].normals {
        assert!(n[2] > 0.99, "expected +Z normal, got {n:?}");
    }
}

#[test]
fn garbage_bytes_are_a_gltf_error() {
    match parse_model(b"not a model at all") {
        Err(AssetError::Gltf(_)) => {}
        other => panic!("expected a glTF error, got {other:?}"),
    }
}

#[test]
fn fallback_plane_matches_requested_extent() {
    let plane = fallback_ground_plane(25.0);
    assert_eq!(plane.positions.len(), 4);
    assert_eq!(plane.indices.len(), 6);
    assert!(plane
        .positions
        .iter()
        .all(|p| p[0].abs() == 25.0 && p[1] == 0.0 && p[2].abs() == 25.0));
    assert!(plane.normals.iter().all(|n| n[1] == 1.0));
    assert!(!plane.is_body);
}

#[test]
fn texture_round_trips_through_png() {
    let mut img = image::RgbaImage::new(2, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
    img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, image::Rgba([255, 255, 255, 128]));

    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .unwrap();

    let tex = decode_texture(bytes.get_ref()).unwrap();
    assert_eq!((tex.width, tex.height), (2, 2));
    assert_eq!(&tex.rgba[0..4], &[255, 0, 0, 255]);
    assert_eq!(tex.rgba.len(), 16);
}

#[test]
fn environment_round_trips_through_hdr() {
    let pixels = [
        image::Rgb([1.5_f32, 0.25, 0.0]),
        image::Rgb([0.0_f32, 2.0, 4.0]),
    ];
    let mut bytes = Vec::new();
    image::codecs::hdr::HdrEncoder::new(&mut bytes)
        .encode(&pixels, 2, 1)
        .unwrap();

    let env = decode_environment(&bytes).unwrap();
    assert_eq!((env.width, env.height), (2, 1));
    assert_eq!(env.pixels.len(), 2);
    // RGBE storage is lossy; just check magnitude and the alpha fill.
    assert!((env.pixels[0][0] - 1.5).abs() < 0.05);
    assert!((env.pixels[1][2] - 4.0).abs() < 0.1);
    assert!(env.pixels.iter().all(|p| p[3] == 1.0));
}

#[test]
fn texture_decode_rejects_garbage() {
    match decode_texture(&[0, 1, 2, 3]) {
        Err(AssetError::Image(_)) => {}
        other => panic!("expected an image error, got {other:?}"),
    }
}
