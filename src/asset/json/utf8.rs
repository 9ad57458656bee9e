use crate::asset::{AssetError, Result};

/// UTF-8 byte order mark.
pub const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decode one code point starting at `bytes[at]`.
///
/// Returns the character and the number of bytes consumed. Rejects the
/// never-valid lead bytes `0xC0`, `0xC1`, `0xF5..=0xFF`, stray continuation
/// bytes, overlong forms, surrogates, and values above `U+10FFFF`.
pub fn decode_code_point(bytes: &[u8], at: usize) -> Result<(char, usize)> {
	let Some(&lead) = bytes.get(at) else {
		return Err(AssetError::Utf8Truncated { at });
	};

	let (len, initial, min) = match lead {
		0x00..=0x7F => return Ok((char::from(lead), 1)),
		0xC2..=0xDF => (2, u32::from(lead & 0x1F), 0x80),
		0xE0..=0xEF => (3, u32::from(lead & 0x0F), 0x800),
		0xF0..=0xF4 => (4, u32::from(lead & 0x07), 0x1_0000),
		_ => return Err(AssetError::Utf8InvalidByte { at, byte: lead }),
	};

	let mut code_point = initial;
	for index in 1..len {
		let Some(&byte) = bytes.get(at + index) else {
			return Err(AssetError::Utf8Truncated { at });
		};
		if byte & 0xC0 != 0x80 {
			return Err(AssetError::Utf8Continuation { at, index });
		}
		code_point = (code_point << 6) | u32::from(byte & 0x3F);
	}

	if code_point < min {
		return Err(AssetError::Utf8OutOfRange { at, code_point, len });
	}
	// Surrogates and values past U+10FFFF.
	let ch = char::from_u32(code_point).ok_or(AssetError::Utf8OutOfRange { at, code_point, len })?;
	Ok((ch, len))
}
