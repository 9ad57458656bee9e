use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::asset::{Gltf, Limits, PNG_SIGNATURE, PngImage, Result, Value, decode_png_with, parse_json_with};

/// Container format sniffed from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
	/// PNG signature.
	Png,
	/// Valid zlib header (deflate method, header checksum divisible by 31).
	Zlib,
	/// First non-whitespace byte opens an object or array.
	Json,
	/// None of the above.
	Unknown,
}

impl AssetKind {
	/// Detect the format of `bytes`.
	pub fn detect(bytes: &[u8]) -> Self {
		if bytes.starts_with(&PNG_SIGNATURE) {
			return Self::Png;
		}
		if let [cmf, flg, ..] = *bytes {
			if cmf & 0x0F == 8 && cmf >> 4 <= 7 && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0 {
				return Self::Zlib;
			}
		}

		let text = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
		match text.iter().find(|byte| !byte.is_ascii_whitespace()) {
			Some(b'{' | b'[') => Self::Json,
			_ => Self::Unknown,
		}
	}

	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Png => "png",
			Self::Zlib => "zlib",
			Self::Json => "json",
			Self::Unknown => "unknown",
		}
	}
}

/// Read and decode a PNG file.
pub fn load_png(path: impl AsRef<Path>) -> Result<PngImage> {
	load_png_with(path, &Limits::default())
}

/// Read and decode a PNG file with explicit limits.
pub fn load_png_with(path: impl AsRef<Path>, limits: &Limits) -> Result<PngImage> {
	let bytes = fs::read(path)?;
	decode_png_with(&bytes, limits)
}

/// Read and parse a JSON file.
pub fn load_json(path: impl AsRef<Path>) -> Result<Value> {
	load_json_with(path, &Limits::default())
}

/// Read and parse a JSON file with explicit limits.
pub fn load_json_with(path: impl AsRef<Path>, limits: &Limits) -> Result<Value> {
	let bytes = fs::read(path)?;
	parse_json_with(&bytes, limits)
}

/// Read a `.gltf` document and the buffers it references.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<Gltf> {
	load_gltf_with(path, &Limits::default())
}

/// Read a `.gltf` document with explicit limits.
pub fn load_gltf_with(path: impl AsRef<Path>, limits: &Limits) -> Result<Gltf> {
	let path = path.as_ref();
	let root = load_json_with(path, limits)?;
	let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
	debug!("gltf: resolving buffers against {}", base_dir.display());
	Gltf::from_value(&root, base_dir)
}

/// Write `value` as pretty-printed JSON.
pub fn write_json(path: impl AsRef<Path>, value: &Value) -> Result<()> {
	let mut writer = BufWriter::new(fs::File::create(path)?);
	serde_json::to_writer_pretty(&mut writer, value).map_err(std::io::Error::from)?;
	writer.write_all(b"\n")?;
	writer.flush()?;
	Ok(())
}
