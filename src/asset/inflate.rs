use log::{debug, warn};

use crate::asset::huffman::MAX_CODE_LENGTH;
use crate::asset::{AssetError, BitCursor, HuffmanTree, Limits, Result};

const LENGTH_BASE: [u16; 29] = [
	3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131, 163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0];
const DIST_BASE: [u16; 30] = [
	1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537, 2049, 3073, 4097, 6145, 8193, 12289,
	16385, 24577,
];
const DIST_EXTRA: [u8; 30] = [0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 13];

/// Order in which code-length code lengths are transmitted.
const CODE_LENGTH_ORDER: [usize; 19] = [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

const END_OF_BLOCK: u16 = 256;

/// DEFLATE block encoding, from the 2-bit `BTYPE` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
	/// `00`: raw bytes.
	Stored,
	/// `01`: predefined Huffman codes.
	Fixed,
	/// `10`: Huffman codes transmitted in the block.
	Dynamic,
}

/// Decompress a zlib-wrapped DEFLATE stream with default limits.
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
	inflate_with(bytes, &Limits::default())
}

/// Decompress a zlib-wrapped DEFLATE stream.
pub fn inflate_with(bytes: &[u8], limits: &Limits) -> Result<Vec<u8>> {
	let mut cursor = BitCursor::new(bytes);
	read_zlib_header(&mut cursor)?;

	let out = inflate_blocks(&mut cursor, limits)?;

	cursor.align();
	match cursor.read_u32_be() {
		// TODO: verify the Adler-32 checksum against `out`.
		Ok(adler) => debug!("zlib: adler-32 trailer {adler:#010x}"),
		Err(_) => warn!("zlib: stream ended without a complete adler-32 trailer"),
	}
	if cursor.remaining() > 0 {
		debug!("zlib: {} trailing bytes after stream", cursor.remaining());
	}

	Ok(out)
}

/// Decompress a raw DEFLATE stream (no zlib header or trailer).
pub fn inflate_raw(bytes: &[u8], limits: &Limits) -> Result<Vec<u8>> {
	let mut cursor = BitCursor::new(bytes);
	inflate_blocks(&mut cursor, limits)
}

fn read_zlib_header(cursor: &mut BitCursor<'_>) -> Result<()> {
	let method = cursor.read_bits(4)? as u8;
	if method != 8 {
		return Err(AssetError::ZlibMethod { method });
	}

	let info = cursor.read_bits(4)? as u8;
	if info > 7 {
		return Err(AssetError::ZlibWindow { info });
	}
	debug!("zlib: window size {}", 1_u32 << (u32::from(info) + 8));

	let flags = cursor.read_u8()?;
	if flags & 0x20 != 0 {
		return Err(AssetError::ZlibPresetDictionary);
	}
	Ok(())
}

fn inflate_blocks(cursor: &mut BitCursor<'_>, limits: &Limits) -> Result<Vec<u8>> {
	let mut out = Output::new(limits.max_output_bytes);

	loop {
		let at = cursor.pos();
		let last = cursor.read_bit()? == 1;
		let block_type = match cursor.read_bits(2)? {
			0 => BlockType::Stored,
			1 => BlockType::Fixed,
			2 => BlockType::Dynamic,
			_ => return Err(AssetError::ReservedBlockType { at }),
		};
		debug!("deflate: {block_type:?} block at offset {at} (last={last})");

		match block_type {
			BlockType::Stored => copy_stored(cursor, &mut out)?,
			BlockType::Fixed => {
				let (literals, distances) = fixed_trees(limits)?;
				inflate_codes(cursor, &mut out, &literals, &distances)?;
			}
			BlockType::Dynamic => {
				let (literals, distances) = read_dynamic_trees(cursor, limits)?;
				inflate_codes(cursor, &mut out, &literals, &distances)?;
			}
		}

		if last {
			break;
		}
	}

	debug!("deflate: inflated {} bytes", out.bytes.len());
	Ok(out.bytes)
}

fn copy_stored(cursor: &mut BitCursor<'_>, out: &mut Output) -> Result<()> {
	cursor.align();
	let len = cursor.read_u16_le()?;
	let nlen = cursor.read_u16_le()?;
	if len != !nlen {
		return Err(AssetError::StoredLengthMismatch { len, nlen });
	}
	out.extend(cursor.read_exact(usize::from(len))?)
}

fn fixed_trees(limits: &Limits) -> Result<(HuffmanTree, HuffmanTree)> {
	let mut lengths = [0_u8; 288];
	lengths[..144].fill(8);
	lengths[144..256].fill(9);
	lengths[256..280].fill(7);
	lengths[280..].fill(8);

	let literals = HuffmanTree::from_lengths(&lengths, limits.max_huffman_nodes)?;
	let distances = HuffmanTree::from_lengths(&[5; 30], limits.max_huffman_nodes)?;
	Ok((literals, distances))
}

fn read_dynamic_trees(cursor: &mut BitCursor<'_>, limits: &Limits) -> Result<(HuffmanTree, HuffmanTree)> {
	let hlit = cursor.read_bits(5)? as usize + 257;
	let hdist = cursor.read_bits(5)? as usize + 1;
	let hclen = cursor.read_bits(4)? as usize + 4;
	debug!("deflate: dynamic codes hlit={hlit} hdist={hdist} hclen={hclen}");

	let mut code_length_lengths = [0_u8; 19];
	for &position in &CODE_LENGTH_ORDER[..hclen] {
		code_length_lengths[position] = cursor.read_bits(3)? as u8;
	}
	let code_length_tree = HuffmanTree::from_lengths(&code_length_lengths, limits.max_huffman_nodes)?;

	let declared = hlit + hdist;
	let mut lengths = Vec::with_capacity(declared);
	while lengths.len() < declared {
		let symbol = code_length_tree.decode(cursor)?;
		let (value, repeat) = match symbol {
			0..=15 => (symbol as u8, 1),
			16 => {
				let previous = *lengths.last().ok_or(AssetError::RepeatWithoutPrevious)?;
				(previous, 3 + cursor.read_bits(2)? as usize)
			}
			17 => (0, 3 + cursor.read_bits(3)? as usize),
			18 => (0, 11 + cursor.read_bits(7)? as usize),
			_ => return Err(AssetError::InvalidCodeLengthSymbol { symbol }),
		};
		if lengths.len() + repeat > declared {
			return Err(AssetError::CodeLengthOverflow { declared });
		}
		lengths.extend(std::iter::repeat_n(value, repeat));
	}
	debug_assert!(lengths.iter().all(|length| usize::from(*length) <= MAX_CODE_LENGTH));

	let literals = HuffmanTree::from_lengths(&lengths[..hlit], limits.max_huffman_nodes)?;
	let distances = HuffmanTree::from_lengths(&lengths[hlit..], limits.max_huffman_nodes)?;
	Ok((literals, distances))
}

fn inflate_codes(cursor: &mut BitCursor<'_>, out: &mut Output, literals: &HuffmanTree, distances: &HuffmanTree) -> Result<()> {
	loop {
		let symbol = literals.decode(cursor)?;
		match symbol {
			0..=255 => out.push(symbol as u8)?,
			END_OF_BLOCK => return Ok(()),
			257..=285 => {
				let idx = usize::from(symbol - 257);
				let length = usize::from(LENGTH_BASE[idx]) + cursor.read_bits(LENGTH_EXTRA[idx])? as usize;

				let dist_symbol = distances.decode(cursor)?;
				let Some(&base) = DIST_BASE.get(usize::from(dist_symbol)) else {
					return Err(AssetError::InvalidDistanceSymbol { symbol: dist_symbol });
				};
				let distance = usize::from(base) + cursor.read_bits(DIST_EXTRA[usize::from(dist_symbol)])? as usize;

				out.copy_back(distance, length)?;
			}
			_ => return Err(AssetError::InvalidLengthSymbol { symbol }),
		}
	}
}

/// Growable output window with a hard size ceiling.
struct Output {
	bytes: Vec<u8>,
	limit: usize,
}

impl Output {
	fn new(limit: usize) -> Self {
		Self { bytes: Vec::new(), limit }
	}

	fn reserve(&mut self, n: usize) -> Result<()> {
		if self.bytes.len() + n > self.limit {
			return Err(AssetError::DecompressedTooLarge { limit: self.limit });
		}
		Ok(())
	}

	fn push(&mut self, byte: u8) -> Result<()> {
		self.reserve(1)?;
		self.bytes.push(byte);
		Ok(())
	}

	fn extend(&mut self, bytes: &[u8]) -> Result<()> {
		self.reserve(bytes.len())?;
		self.bytes.extend_from_slice(bytes);
		Ok(())
	}

	/// Copy `length` bytes starting `distance` back; source may overlap destination.
	fn copy_back(&mut self, distance: usize, length: usize) -> Result<()> {
		let produced = self.bytes.len();
		if distance == 0 || distance > produced {
			return Err(AssetError::DistanceTooFar { distance, produced });
		}
		self.reserve(length)?;

		let start = produced - distance;
		if distance >= length {
			self.bytes.extend_from_within(start..start + length);
		} else {
			for index in 0..length {
				let byte = self.bytes[start + index];
				self.bytes.push(byte);
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
