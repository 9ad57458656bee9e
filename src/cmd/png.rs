use std::path::PathBuf;

use assetdoc::asset::{Limits, Result, load_png_with};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Write decoded RGBA8 pixels to this file.
	#[arg(long)]
	pub out: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

/// Decode a PNG and report its dimensions.
pub fn run(args: Args, limits: &Limits) -> Result<()> {
	let Args { path, out, json } = args;

	let image = load_png_with(&path, limits)?;
	if let Some(out) = &out {
		std::fs::write(out, &image.pixels)?;
	}

	let payload = PngJson {
		path: path.display().to_string(),
		width: image.width,
		height: image.height,
		pixel_bytes: image.pixels.len(),
		first_pixel: image.pixels.get(..4).map(|rgba| [rgba[0], rgba[1], rgba[2], rgba[3]]),
		out: out.as_ref().map(|item| item.display().to_string()),
	};

	if json {
		return emit_json(&payload);
	}

	println!("path: {}", payload.path);
	println!("width: {}", payload.width);
	println!("height: {}", payload.height);
	println!("pixel_bytes: {}", payload.pixel_bytes);
	if let Some([r, g, b, a]) = payload.first_pixel {
		println!("first_pixel: {r} {g} {b} {a}");
	}
	if let Some(out) = &payload.out {
		println!("wrote: {out}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct PngJson {
	path: String,
	width: u32,
	height: u32,
	pixel_bytes: usize,
	first_pixel: Option<[u8; 4]>,
	#[serde(skip_serializing_if = "Option::is_none")]
	out: Option<String>,
}
