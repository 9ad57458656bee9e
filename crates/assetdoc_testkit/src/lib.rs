//! Shared test helpers: tiny encoders that build zlib and PNG fixtures in-test.

use std::path::PathBuf;

/// LSB-first bit packer matching the DEFLATE bit order.
#[derive(Debug, Default)]
pub struct BitWriter {
	bytes: Vec<u8>,
	bit: u8,
}

impl BitWriter {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append the low `n` bits of `value`, least significant first.
	pub fn write_bits(&mut self, value: u32, n: u8) {
		for shift in 0..n {
			if self.bit == 0 {
				self.bytes.push(0);
			}
			let bit = ((value >> shift) & 1) as u8;
			if let Some(last) = self.bytes.last_mut() {
				*last |= bit << self.bit;
			}
			self.bit = (self.bit + 1) % 8;
		}
	}

	/// Append a Huffman code, most significant bit first.
	pub fn write_code(&mut self, code: u32, length: u8) {
		for shift in (0..length).rev() {
			self.write_bits((code >> shift) & 1, 1);
		}
	}

	/// Pad with zero bits up to the next byte boundary.
	pub fn align(&mut self) {
		self.bit = 0;
	}

	/// Append whole bytes after aligning.
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.align();
		self.bytes.extend_from_slice(bytes);
	}

	/// Return the packed bytes.
	pub fn finish(self) -> Vec<u8> {
		self.bytes
	}
}

/// One LZ77 instruction for [`fixed_block`].
#[derive(Debug, Clone, Copy)]
pub enum Token {
	/// Emit one byte.
	Literal(u8),
	/// Copy `length` bytes from `distance` bytes back.
	Match {
		/// 3..=258.
		length: u16,
		/// 1..=32768.
		distance: u16,
	},
}

const LENGTH_BASE: [u16; 29] = [
	3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131, 163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0];
const DIST_BASE: [u16; 30] = [
	1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537, 2049, 3073, 4097, 6145, 8193, 12289,
	16385, 24577,
];
const DIST_EXTRA: [u8; 30] = [0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 13];

/// Write the fixed literal/length code for `symbol`.
pub fn write_fixed_symbol(writer: &mut BitWriter, symbol: u16) {
	let symbol = u32::from(symbol);
	match symbol {
		0..=143 => writer.write_code(0x30 + symbol, 8),
		144..=255 => writer.write_code(0x190 + symbol - 144, 9),
		256..=279 => writer.write_code(symbol - 256, 7),
		_ => writer.write_code(0xC0 + symbol - 280, 8),
	}
}

/// Write one fixed-Huffman block (header, tokens, end-of-block).
pub fn write_fixed_block(writer: &mut BitWriter, tokens: &[Token], last: bool) {
	writer.write_bits(u32::from(last), 1);
	writer.write_bits(0b01, 2);
	for token in tokens {
		match *token {
			Token::Literal(byte) => write_fixed_symbol(writer, u16::from(byte)),
			Token::Match { length, distance } => {
				let idx = LENGTH_BASE.iter().rposition(|base| *base <= length).unwrap_or(0);
				write_fixed_symbol(writer, 257 + idx as u16);
				writer.write_bits(u32::from(length - LENGTH_BASE[idx]), LENGTH_EXTRA[idx]);

				let dist = DIST_BASE.iter().rposition(|base| *base <= distance).unwrap_or(0);
				writer.write_code(dist as u32, 5);
				writer.write_bits(u32::from(distance - DIST_BASE[dist]), DIST_EXTRA[dist]);
			}
		}
	}
	write_fixed_symbol(writer, 256);
}

/// Raw DEFLATE stream holding one final fixed-Huffman block.
pub fn fixed_block(tokens: &[Token]) -> Vec<u8> {
	let mut writer = BitWriter::new();
	write_fixed_block(&mut writer, tokens, true);
	writer.finish()
}

/// Raw DEFLATE stream of stored blocks (empty input yields one empty block).
pub fn stored_blocks(data: &[u8]) -> Vec<u8> {
	let mut out = Vec::new();
	let mut chunks: Vec<&[u8]> = data.chunks(0xFFFF).collect();
	if chunks.is_empty() {
		chunks.push(&[]);
	}
	let last_index = chunks.len() - 1;
	for (index, chunk) in chunks.into_iter().enumerate() {
		out.push(u8::from(index == last_index));
		let len = chunk.len() as u16;
		out.extend_from_slice(&len.to_le_bytes());
		out.extend_from_slice(&(!len).to_le_bytes());
		out.extend_from_slice(chunk);
	}
	out
}

/// Wrap a raw DEFLATE stream in a zlib header and Adler-32 trailer.
pub fn zlib_wrap(deflate: &[u8], original: &[u8]) -> Vec<u8> {
	let mut out = vec![0x78, 0x01];
	out.extend_from_slice(deflate);
	out.extend_from_slice(&adler32(original).to_be_bytes());
	out
}

/// zlib stream storing `data` uncompressed.
pub fn zlib_stored(data: &[u8]) -> Vec<u8> {
	zlib_wrap(&stored_blocks(data), data)
}

/// Adler-32 checksum.
pub fn adler32(data: &[u8]) -> u32 {
	let (mut a, mut b) = (1_u32, 0_u32);
	for byte in data {
		a = (a + u32::from(*byte)) % 65521;
		b = (b + a) % 65521;
	}
	(b << 16) | a
}

/// CRC-32 (ISO-HDLC) as used by PNG chunks.
pub fn crc32(data: &[u8]) -> u32 {
	let mut crc = 0xFFFF_FFFF_u32;
	for byte in data {
		crc ^= u32::from(*byte);
		for _ in 0..8 {
			let mask = (crc & 1).wrapping_neg();
			crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
		}
	}
	!crc
}

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode one PNG chunk with a valid CRC.
pub fn png_chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(12 + data.len());
	out.extend_from_slice(&(data.len() as u32).to_be_bytes());
	out.extend_from_slice(kind);
	out.extend_from_slice(data);
	let mut covered = kind.to_vec();
	covered.extend_from_slice(data);
	out.extend_from_slice(&crc32(&covered).to_be_bytes());
	out
}

/// IHDR payload with explicit format bytes.
pub fn ihdr(width: u32, height: u32, depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
	let mut out = Vec::with_capacity(13);
	out.extend_from_slice(&width.to_be_bytes());
	out.extend_from_slice(&height.to_be_bytes());
	out.extend_from_slice(&[depth, color_type, 0, 0, interlace]);
	out
}

/// RGBA8 PNG from already-filtered scanlines, split over `idat_parts` IDAT chunks.
pub fn png_from_scanlines(width: u32, height: u32, scanlines: &[u8], idat_parts: usize) -> Vec<u8> {
	png_from_zlib(width, height, &zlib_stored(scanlines), idat_parts)
}

/// RGBA8 PNG around an already-compressed zlib stream.
pub fn png_from_zlib(width: u32, height: u32, compressed: &[u8], idat_parts: usize) -> Vec<u8> {
	let mut out = PNG_SIGNATURE.to_vec();
	out.extend(png_chunk(b"IHDR", &ihdr(width, height, 8, 6, 0)));
	out.extend(png_chunk(b"tEXt", b"Comment\0assetdoc fixture"));
	let part = compressed.len().div_ceil(idat_parts.max(1)).max(1);
	for chunk in compressed.chunks(part) {
		out.extend(png_chunk(b"IDAT", chunk));
	}
	out.extend(png_chunk(b"IEND", &[]));
	out
}

/// RGBA8 PNG whose every row uses filter type 0.
pub fn png_unfiltered(width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
	png_from_scanlines(width, height, &filter_none(width, pixels), 1)
}

/// Prefix each row of `pixels` with a filter-type-0 byte.
pub fn filter_none(width: u32, pixels: &[u8]) -> Vec<u8> {
	let stride = width as usize * 4;
	let mut out = Vec::with_capacity(pixels.len() + pixels.len() / stride.max(1));
	for row in pixels.chunks(stride.max(1)) {
		out.push(0);
		out.extend_from_slice(row);
	}
	out
}

/// Fresh empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("assetdoc-{name}-{}", std::process::id()));
	let _ = std::fs::remove_dir_all(&dir);
	std::fs::create_dir_all(&dir).unwrap_or_else(|err| panic!("create temp dir {}: {err}", dir.display()));
	dir
}
