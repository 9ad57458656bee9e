use crate::asset::{AssetError, Result};

/// Bounded cursor over an immutable byte slice with LSB-first bit reads.
///
/// Bit reads consume each byte from its least significant bit upward, as
/// DEFLATE requires. Byte-level reads require the cursor to sit on a byte
/// boundary; call [`BitCursor::align`] first when coming out of a bit stream.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	bit: u8,
}

impl<'a> BitCursor<'a> {
	/// Create a cursor at byte 0, bit 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0, bit: 0 }
	}

	/// Current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Bit position inside the current byte (`0..8`).
	pub fn bit(&self) -> u8 {
		self.bit
	}

	/// Whole bytes left, counting a partially consumed byte as used.
	pub fn remaining(&self) -> usize {
		let used = self.pos + usize::from(self.bit > 0);
		self.bytes.len().saturating_sub(used)
	}

	/// Read one bit.
	pub fn read_bit(&mut self) -> Result<u8> {
		let Some(byte) = self.bytes.get(self.pos) else {
			return Err(self.eof(1));
		};
		let bit = (byte >> self.bit) & 1;
		if self.bit == 7 {
			self.bit = 0;
			self.pos += 1;
		} else {
			self.bit += 1;
		}
		Ok(bit)
	}

	/// Read `n` bits (at most 32), first bit read lands in bit 0 of the result.
	pub fn read_bits(&mut self, n: u8) -> Result<u32> {
		debug_assert!(n <= 32);
		let mut value = 0_u32;
		for shift in 0..n {
			value |= u32::from(self.read_bit()?) << shift;
		}
		Ok(value)
	}

	/// Discard the rest of a partially consumed byte.
	pub fn align(&mut self) {
		if self.bit > 0 {
			self.bit = 0;
			self.pos += 1;
		}
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if self.bit != 0 {
			return Err(AssetError::Unaligned { at: self.pos, bit: self.bit });
		}
		if n > self.remaining() {
			return Err(self.eof(n));
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Skip `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	/// Read a four-byte chunk tag.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		let raw = self.read_exact(4)?;
		let mut out = [0_u8; 4];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a single byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		let raw = self.read_exact(2)?;
		Ok(u16::from_le_bytes([raw[0], raw[1]]))
	}

	/// Read a big-endian `u32`.
	pub fn read_u32_be(&mut self) -> Result<u32> {
		let raw = self.read_code4()?;
		Ok(u32::from_be_bytes(raw))
	}

	fn eof(&self, need: usize) -> AssetError {
		AssetError::UnexpectedEof {
			at: self.pos,
			need,
			rem: self.remaining(),
		}
	}
}
