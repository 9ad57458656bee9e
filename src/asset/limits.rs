/// Resource ceilings applied by every decoder entry point.
#[derive(Debug, Clone)]
pub struct Limits {
	/// Maximum inflated output size in bytes.
	pub max_output_bytes: usize,
	/// Maximum node count of one Huffman tree arena.
	pub max_huffman_nodes: usize,
	/// Maximum JSON object/array nesting depth.
	pub max_json_depth: usize,
	/// Maximum length of one JSON string or number literal (escaped form).
	pub max_json_scratch: usize,
	/// Maximum `width * height` accepted from a PNG header.
	pub max_image_pixels: u64,
}

impl Default for Limits {
	fn default() -> Self {
		Self {
			max_output_bytes: 512 * 1024 * 1024,
			max_huffman_nodes: 5000,
			max_json_depth: 512,
			max_json_scratch: 1024 * 1024,
			max_image_pixels: 1 << 28,
		}
	}
}

impl Limits {
	/// Tight preset for untrusted input.
	pub fn strict() -> Self {
		Self {
			max_output_bytes: 64 * 1024 * 1024,
			max_huffman_nodes: 5000,
			max_json_depth: 64,
			max_json_scratch: 64 * 1024,
			max_image_pixels: 4096 * 4096,
		}
	}
}
