use log::{debug, warn};

use crate::asset::{AssetError, BitCursor, Limits, Result, inflate_with};

/// First 8 bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const BYTES_PER_PIXEL: usize = 4;
const IHDR_LEN: u32 = 13;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
	/// Width in pixels.
	pub width: u32,
	/// Height in pixels.
	pub height: u32,
	/// `width * height * 4` bytes, stride `width * 4`.
	pub pixels: Vec<u8>,
}

/// Fields of the `IHDR` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngHeader {
	/// Width in pixels.
	pub width: u32,
	/// Height in pixels.
	pub height: u32,
	/// Bits per sample.
	pub bit_depth: u8,
	/// Color type code.
	pub color_type: u8,
	/// Interlace method (0 none, 1 Adam7).
	pub interlace: u8,
}

/// Per-row scanline filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
	/// Raw bytes.
	None,
	/// Delta from the byte one pixel to the left.
	Sub,
	/// Delta from the byte above.
	Up,
	/// Delta from the mean of left and above.
	Average,
	/// Delta from the Paeth predictor.
	Paeth,
}

impl FilterType {
	/// Map a filter type byte.
	pub fn from_byte(byte: u8) -> Option<Self> {
		Some(match byte {
			0 => Self::None,
			1 => Self::Sub,
			2 => Self::Up,
			3 => Self::Average,
			4 => Self::Paeth,
			_ => return None,
		})
	}
}

/// Decode an 8-bit RGBA PNG with default limits.
pub fn decode_png(bytes: &[u8]) -> Result<PngImage> {
	decode_png_with(bytes, &Limits::default())
}

/// Decode an 8-bit RGBA PNG.
pub fn decode_png_with(bytes: &[u8], limits: &Limits) -> Result<PngImage> {
	let (header, compressed) = read_chunks(bytes, limits)?;
	debug!("png: {} compressed bytes across IDAT chunks", compressed.len());

	let mut data = inflate_with(&compressed, limits)?;
	debug!("png: {} bytes after inflate", data.len());

	unfilter(&mut data, header.width as usize, header.height as usize, BYTES_PER_PIXEL)?;

	Ok(PngImage {
		width: header.width,
		height: header.height,
		pixels: data,
	})
}

/// Validate the signature and chunk layout, returning the header and the joined IDAT payload.
pub fn read_chunks(bytes: &[u8], limits: &Limits) -> Result<(PngHeader, Vec<u8>)> {
	if !bytes.starts_with(&PNG_SIGNATURE) {
		return Err(AssetError::PngSignature {
			got: bytes.iter().take(PNG_SIGNATURE.len()).copied().collect(),
		});
	}

	let mut cursor = BitCursor::new(bytes);
	cursor.skip(PNG_SIGNATURE.len())?;

	let mut header = None;
	let mut compressed = Vec::new();
	loop {
		if cursor.remaining() == 0 {
			return Err(AssetError::PngMissingEnd);
		}

		let len = cursor.read_u32_be()?;
		let kind = cursor.read_code4()?;
		if header.is_none() && kind != *b"IHDR" {
			return Err(AssetError::PngFirstChunk { got: kind });
		}

		let data = cursor.read_exact(len as usize)?;
		// TODO: verify the chunk CRC over type and data.
		let _crc = cursor.read_u32_be()?;

		match &kind {
			b"IHDR" if header.is_none() => {
				if len != IHDR_LEN {
					return Err(AssetError::PngHeaderLength { len });
				}
				header = Some(parse_header(data, limits)?);
			}
			b"IDAT" => compressed.extend_from_slice(data),
			b"IEND" => break,
			_ => debug!("png: skipping {} chunk ({len} bytes)", String::from_utf8_lossy(&kind)),
		}
	}

	if cursor.remaining() > 0 {
		warn!("png: {} bytes after IEND ignored", cursor.remaining());
	}

	let header = header.ok_or(AssetError::PngMissingEnd)?;
	Ok((header, compressed))
}

fn parse_header(data: &[u8], limits: &Limits) -> Result<PngHeader> {
	let mut cursor = BitCursor::new(data);
	let width = cursor.read_u32_be()?;
	let height = cursor.read_u32_be()?;
	let bit_depth = cursor.read_u8()?;
	let color_type = cursor.read_u8()?;
	let compression = cursor.read_u8()?;
	let filter = cursor.read_u8()?;
	let interlace = cursor.read_u8()?;
	debug!("png: IHDR {width}x{height} depth={bit_depth} color={color_type} interlace={interlace}");

	if width == 0 || height == 0 {
		return Err(AssetError::PngZeroDimension { width, height });
	}
	if bit_depth != 8 {
		return Err(AssetError::PngBitDepth { depth: bit_depth });
	}
	if color_type != 6 {
		return Err(AssetError::PngColorType { color_type });
	}
	if compression != 0 {
		return Err(AssetError::PngCompressionMethod { method: compression });
	}
	if filter != 0 {
		return Err(AssetError::PngFilterMethod { method: filter });
	}
	if interlace != 0 {
		return Err(AssetError::PngInterlaced);
	}

	let pixels = u64::from(width) * u64::from(height);
	if pixels > limits.max_image_pixels {
		return Err(AssetError::PngTooLarge {
			width,
			height,
			limit: limits.max_image_pixels,
		});
	}

	Ok(PngHeader {
		width,
		height,
		bit_depth,
		color_type,
		interlace,
	})
}

/// Reverse scanline filters in place.
///
/// `data` holds `height` rows of one filter byte followed by `width * bpp`
/// filtered bytes. On success it is truncated to the reconstructed pixels.
/// Each output byte lands at or before the input byte it came from, so
/// processing strictly left to right, top to bottom never reads a byte
/// that has already been overwritten.
pub fn unfilter(data: &mut Vec<u8>, width: usize, height: usize, bpp: usize) -> Result<()> {
	let stride = width * bpp;
	let need = height * (stride + 1);
	if data.len() < need {
		return Err(AssetError::PngDataTooShort { need, have: data.len() });
	}

	for row in 0..height {
		let filter_at = row * (stride + 1);
		let filter = FilterType::from_byte(data[filter_at]).ok_or(AssetError::PngFilterType { row, filter: data[filter_at] })?;

		let out_row = row * stride;
		for col in 0..stride {
			let raw = data[filter_at + 1 + col];
			let a = if col >= bpp { data[out_row + col - bpp] } else { 0 };
			let b = if row > 0 { data[out_row - stride + col] } else { 0 };
			let c = if row > 0 && col >= bpp { data[out_row - stride + col - bpp] } else { 0 };

			let predicted = match filter {
				FilterType::None => 0,
				FilterType::Sub => a,
				FilterType::Up => b,
				FilterType::Average => ((u16::from(a) + u16::from(b)) / 2) as u8,
				FilterType::Paeth => paeth(a, b, c),
			};
			data[out_row + col] = raw.wrapping_add(predicted);
		}
	}

	data.truncate(height * stride);
	Ok(())
}

/// Paeth predictor: whichever of `a`, `b`, `c` is closest to `a + b - c`, ties in that order.
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
	let p = i16::from(a) + i16::from(b) - i16::from(c);
	let pa = (p - i16::from(a)).abs();
	let pb = (p - i16::from(b)).abs();
	let pc = (p - i16::from(c)).abs();
	if pa <= pb && pa <= pc {
		a
	} else if pb <= pc {
		b
	} else {
		c
	}
}

#[cfg(test)]
mod tests;
