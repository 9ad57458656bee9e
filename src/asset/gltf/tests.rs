use crate::asset::{AssetError, ComponentType, ElementType, ErrorKind, Gltf, Model, Result, parse_json};

const POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.5]];

fn triangle_buffer() -> Vec<u8> {
	let mut bytes = Vec::new();
	for position in POSITIONS {
		for component in position {
			bytes.extend_from_slice(&component.to_le_bytes());
		}
	}
	for index in [0_u16, 2, 1] {
		bytes.extend_from_slice(&index.to_le_bytes());
	}
	bytes
}

fn triangle_document(extra_primitive: &str) -> String {
	format!(
		r#"{{
			"asset": {{"version": "2.0"}},
			"buffers": [{{"uri": "tri.bin", "byteLength": 42}}],
			"bufferViews": [
				{{"buffer": 0, "byteLength": 36, "target": 34962}},
				{{"buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963}}
			],
			"accessors": [
				{{"bufferView": 0, "count": 3, "componentType": 5126, "type": "VEC3"}},
				{{"bufferView": 1, "count": 3, "componentType": 5123, "type": "SCALAR"}}
			],
			"meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}, "indices": 1}}{extra_primitive}]}}]
		}}"#
	)
}

fn extract(document: &str, buffer: Vec<u8>) -> Result<Gltf> {
	let root = parse_json(document.as_bytes())?;
	Gltf::from_value_with(&root, |uri| {
		assert_eq!(uri, "tri.bin");
		Ok(buffer.clone())
	})
}

#[test]
fn extracts_triangle_document() {
	let gltf = extract(&triangle_document(""), triangle_buffer()).expect("extract gltf");
	assert_eq!(gltf.scene, 0);
	assert_eq!(gltf.buffers[0].len(), 42);
	assert_eq!(gltf.buffer_views[1].byte_offset, 36);
	assert_eq!(gltf.buffer_views[1].target, Some(34963));
	assert_eq!(gltf.accessors[0].component_type, ComponentType::F32);
	assert_eq!(gltf.accessors[0].element_type, ElementType::Vec3);
	assert_eq!(gltf.accessors[0].element_size(), 12);
	assert_eq!(gltf.meshes[0].primitives[0].indices, Some(1));
}

#[test]
fn model_reads_positions_and_widens_indices() {
	let gltf = extract(&triangle_document(""), triangle_buffer()).expect("extract gltf");
	let model = Model::from_gltf(&gltf, 0, 0).expect("extract model");
	assert_eq!(model.positions, POSITIONS);
	assert_eq!(model.indices, [0, 2, 1]);
}

#[test]
fn non_indexed_primitive_gets_sequential_indices() {
	let extra = r#", {"attributes": {"POSITION": 0}}"#;
	let gltf = extract(&triangle_document(extra), triangle_buffer()).expect("extract gltf");
	let model = Model::from_gltf(&gltf, 0, 1).expect("extract model");
	assert_eq!(model.indices, [0, 1, 2]);
}

#[test]
fn honors_byte_stride() {
	let mut buffer = Vec::new();
	for position in POSITIONS {
		for component in position {
			buffer.extend_from_slice(&component.to_le_bytes());
		}
		buffer.extend_from_slice(&[0xAA; 4]);
	}
	let document = r#"{
		"buffers": [{"uri": "tri.bin", "byteLength": 48}],
		"bufferViews": [{"buffer": 0, "byteLength": 48, "byteStride": 16}],
		"accessors": [{"bufferView": 0, "count": 3, "componentType": 5126, "type": "VEC3"}],
		"meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
		"scene": 2
	}"#;
	let gltf = extract(document, buffer).expect("extract gltf");
	assert_eq!(gltf.scene, 2);
	let model = Model::from_gltf(&gltf, 0, 0).expect("extract model");
	assert_eq!(model.positions, POSITIONS);
}

#[test]
fn buffer_length_must_match() {
	let err = extract(&triangle_document(""), vec![0; 40]).expect_err("short buffer");
	assert!(matches!(err, AssetError::GltfBufferLength { index: 0, declared: 42, actual: 40 }));
}

#[test]
fn sparse_accessors_are_unimplemented() {
	let document = triangle_document("").replace(r#""type": "SCALAR""#, r#""type": "SCALAR", "sparse": {"count": 1}"#);
	let err = extract(&document, triangle_buffer()).expect_err("sparse");
	assert!(matches!(err, AssetError::Unimplemented { feature: "sparse accessors" }));
	assert_eq!(err.kind(), ErrorKind::UnimplementedFeature);
}

#[test]
fn data_uri_buffers_are_unimplemented() {
	let document = triangle_document("").replace("tri.bin", "data:application/octet-stream;base64,AAAA");
	let err = extract(&document, triangle_buffer()).expect_err("data uri");
	assert_eq!(err.kind(), ErrorKind::UnimplementedFeature);
}

#[test]
fn rejects_missing_and_mistyped_fields() {
	let document = triangle_document("").replace(r#", "componentType": 5123"#, "");
	let err = extract(&document, triangle_buffer()).expect_err("no componentType");
	assert!(matches!(err, AssetError::GltfMissing { context: "accessors", field: "componentType" }));

	let document = triangle_document("").replace("5123", "5124");
	let err = extract(&document, triangle_buffer()).expect_err("bad componentType");
	assert!(matches!(err, AssetError::GltfInvalid { field: "componentType", .. }));

	let document = triangle_document("").replace(r#""count": 3, "componentType": 5126"#, r#""count": -3, "componentType": 5126"#);
	let err = extract(&document, triangle_buffer()).expect_err("negative count");
	assert!(matches!(err, AssetError::GltfInvalid { field: "count", .. }));
}

#[test]
fn rejects_dangling_indices() {
	let document = triangle_document("").replace(r#""indices": 1"#, r#""indices": 7"#);
	let err = extract(&document, triangle_buffer()).expect_err("accessor 7");
	assert!(matches!(err, AssetError::GltfIndex { kind: "accessor", index: 7, count: 2 }));

	let gltf = extract(&triangle_document(""), triangle_buffer()).expect("extract gltf");
	let err = Model::from_gltf(&gltf, 1, 0).expect_err("mesh 1");
	assert!(matches!(err, AssetError::GltfIndex { kind: "mesh", index: 1, count: 1 }));
}

#[test]
fn accessor_past_view_end_is_rejected() {
	let document = triangle_document("").replace(r#""count": 3, "componentType": 5123"#, r#""count": 4, "componentType": 5123"#);
	let gltf = extract(&document, triangle_buffer()).expect("extract gltf");
	let err = Model::from_gltf(&gltf, 0, 0).expect_err("index accessor overruns");
	assert!(matches!(err, AssetError::GltfAccessorBounds { index: 1, need: 44, have: 42 }));
}

#[test]
fn position_accessor_must_be_float_vec3() {
	let document = triangle_document("").replace(r#""type": "VEC3""#, r#""type": "VEC2""#);
	let gltf = extract(&document, triangle_buffer()).expect("extract gltf");
	let err = Model::from_gltf(&gltf, 0, 0).expect_err("VEC2 positions");
	assert!(matches!(err, AssetError::GltfInvalid { field: "POSITION", .. }));
}

#[test]
fn sequential_indices_cover_every_vertex() {
	assert_eq!(super::sequential_indices(4).expect("small count"), [0, 1, 2, 3]);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn sequential_indices_reject_counts_past_u32() {
	let count = u32::MAX as usize + 1;
	let err = super::sequential_indices(count).expect_err("count does not fit u32");
	assert!(matches!(err, AssetError::GltfInvalid { field: "POSITION", .. }));
}
