use std::path::PathBuf;

use assetdoc::asset::{Limits, Model, Result, load_gltf_with};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Load a glTF document and summarize each mesh primitive.
pub fn run(args: Args, limits: &Limits) -> Result<()> {
	let Args { path, json } = args;

	let gltf = load_gltf_with(&path, limits)?;

	let mut primitives = Vec::new();
	for (mesh_index, mesh) in gltf.meshes.iter().enumerate() {
		for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
			let model = Model::from_gltf(&gltf, mesh_index, primitive_index)?;
			primitives.push(PrimitiveJson {
				mesh: mesh_index,
				primitive: primitive_index,
				vertices: model.positions.len(),
				indices: model.indices.len(),
				indexed: primitive.indices.is_some(),
				has_normals: primitive.normal.is_some(),
				has_tangents: primitive.tangent.is_some(),
			});
		}
	}

	let payload = GltfJson {
		path: path.display().to_string(),
		scene: gltf.scene,
		buffers: gltf.buffers.iter().map(Vec::len).collect(),
		buffer_views: gltf.buffer_views.len(),
		accessors: gltf.accessors.len(),
		meshes: gltf.meshes.len(),
		primitives,
	};

	if json {
		return emit_json(&payload);
	}

	println!("path: {}", payload.path);
	println!("scene: {}", payload.scene);
	println!("buffers: {}", payload.buffers.len());
	println!("buffer_views: {}", payload.buffer_views);
	println!("accessors: {}", payload.accessors);
	println!("meshes: {}", payload.meshes);
	println!();
	println!("mesh\tprimitive\tvertices\tindices\tindexed\tnormals\ttangents");
	for item in &payload.primitives {
		println!(
			"{}\t{}\t{}\t{}\t{}\t{}\t{}",
			item.mesh, item.primitive, item.vertices, item.indices, item.indexed, item.has_normals, item.has_tangents
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct GltfJson {
	path: String,
	scene: usize,
	buffers: Vec<usize>,
	buffer_views: usize,
	accessors: usize,
	meshes: usize,
	primitives: Vec<PrimitiveJson>,
}

#[derive(serde::Serialize)]
struct PrimitiveJson {
	mesh: usize,
	primitive: usize,
	vertices: usize,
	indices: usize,
	indexed: bool,
	has_normals: bool,
	has_tangents: bool,
}
