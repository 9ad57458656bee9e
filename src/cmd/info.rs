use std::path::PathBuf;

use assetdoc::asset::{AssetKind, Limits, Result, inflate_with, parse_json_with, read_chunks, unescape};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print detected format and format-level facts.
pub fn run(args: Args, limits: &Limits) -> Result<()> {
	let Args { path, json } = args;

	let bytes = std::fs::read(&path)?;
	let kind = AssetKind::detect(&bytes);
	let mut payload = InfoJson {
		path: path.display().to_string(),
		kind: kind.as_str(),
		size: bytes.len(),
		png: None,
		zlib: None,
		json: None,
	};

	match kind {
		AssetKind::Png => {
			let (header, compressed) = read_chunks(&bytes, limits)?;
			payload.png = Some(PngJson {
				width: header.width,
				height: header.height,
				bit_depth: header.bit_depth,
				color_type: header.color_type,
				idat_bytes: compressed.len(),
			});
		}
		AssetKind::Zlib => {
			let out = inflate_with(&bytes, limits)?;
			payload.zlib = Some(ZlibJson { inflated_bytes: out.len() });
		}
		AssetKind::Json => {
			let root = parse_json_with(&bytes, limits)?;
			let mut keys: Vec<String> = root.as_object().map(|map| map.keys().map(|key| unescape(key)).collect()).unwrap_or_default();
			keys.sort();
			payload.json = Some(JsonJson {
				root: root.kind_name(),
				children: root.len(),
				keys,
			});
		}
		AssetKind::Unknown => {}
	}

	if json {
		return emit_json(&payload);
	}

	println!("path: {}", payload.path);
	println!("kind: {}", payload.kind);
	println!("size: {}", payload.size);
	if let Some(png) = &payload.png {
		println!("width: {}", png.width);
		println!("height: {}", png.height);
		println!("bit_depth: {}", png.bit_depth);
		println!("color_type: {}", png.color_type);
		println!("idat_bytes: {}", png.idat_bytes);
	}
	if let Some(zlib) = &payload.zlib {
		println!("inflated_bytes: {}", zlib.inflated_bytes);
	}
	if let Some(doc) = &payload.json {
		println!("root: {}", doc.root);
		println!("children: {}", doc.children);
		if !doc.keys.is_empty() {
			println!("keys: {}", doc.keys.join(", "));
		}
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	kind: &'static str,
	size: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	png: Option<PngJson>,
	#[serde(skip_serializing_if = "Option::is_none")]
	zlib: Option<ZlibJson>,
	#[serde(skip_serializing_if = "Option::is_none")]
	json: Option<JsonJson>,
}

#[derive(serde::Serialize)]
struct PngJson {
	width: u32,
	height: u32,
	bit_depth: u8,
	color_type: u8,
	idat_bytes: usize,
}

#[derive(serde::Serialize)]
struct ZlibJson {
	inflated_bytes: usize,
}

#[derive(serde::Serialize)]
struct JsonJson {
	root: &'static str,
	children: usize,
	keys: Vec<String>,
}
