use assetdoc_testkit::{Token, fixed_block, stored_blocks, zlib_stored, zlib_wrap};

use crate::asset::{AssetError, ErrorKind, Limits, inflate, inflate_raw, inflate_with};

/// `zlib.compress(b"the quick brown fox jumps over the lazy dog. " * 20, 9)`: one fixed block.
const FIXED_FOX: &str = "78da2bc94855282ccd4cce56482aca2fcf5348cbaf50c82acd2d2856c82f4b2d5228014ae72456552aa4e4a7eb8179a38a47158f2aa6aa6200e521459c";

/// `zlib.compress(b"0,1,2,...,299,", 9)`: one dynamic block.
const DYNAMIC_NUMBERS: &[&str] = &[
	"78da1dd3c98103310c03c184f010a093f92736cdf963d77617356445534b5b47574f250fd972e4292f79cb47bef2934b",
	"190a7f13652a4bd9ca51aef294d21c9ad6e45f4ecda5b9358fe6d57c9aa535b4ac152d3e71696dada375b59e56690f6d",
	"6b477b6af385b6f6d1beda4fbb74868e75a23375960edff7e85c9da753ba43d7bad19dba4b77ebf273aeeed32dbda167",
	"bde84dbda5b7f58e1ebff6e9956aa8ac8a6aaa966aab8eeaaa88d135c831e83108322832483268328832a832c832d8fd",
	"d9d875b82ed7e9ba5dc7eb7a9d8f7e26a0d37dd9d1d04434154d46d3d18434254d4ad3d2b321d891d3f434414d5193d4",
	"3435514d5593d5abc5d851d6a4356d4d5c53d7e4357d4d6053d8bb69d911d95436994d6713da9436a94d6b13dba76f80",
	"1dbd4d7053dc2437cd4d7453dd6437dd7dfb58d891deb437f14d7d93dff4370046c010f8f555b143c13018070361240c",
	"85b1301846c3d5e7d7f7c701e2113c8247f0081ec12378048fe011f7a1b2c32378048fe0113c8247f048df731ff47fd1",
	"ecfaa6fba8fbaafbacfbaefbb0f1081ec123b34f9f1d1ec12378048fe0113c8247f0081e59fd46d8e1113c8247f0081e",
	"c12378048fe091dd8f891d1ec12378048fe0113c8247f0081e39fdead8e1113c8247f0081ec12378048fe091dbcf931d",
	"1ec12378048fe0113c8247f0081e79fd8ed9e1113c8247f0081ec12378048fe091ea075ffa00054cd369",
];

fn hex(parts: &[&str]) -> Vec<u8> {
	let text: String = parts.concat();
	(0..text.len())
		.step_by(2)
		.map(|at| u8::from_str_radix(&text[at..at + 2], 16).expect("fixture is hex"))
		.collect()
}

fn numbers() -> Vec<u8> {
	(0..300).map(|value| format!("{value},")).collect::<String>().into_bytes()
}

#[test]
fn stored_block_returns_payload_unchanged() {
	let data: Vec<u8> = (0..=255_u8).cycle().take(1000).collect();
	assert_eq!(inflate(&zlib_stored(&data)).expect("stored stream inflates"), data);
}

#[test]
fn stored_block_accepts_maximum_length() {
	let data: Vec<u8> = (0..65535_u32).map(|value| (value * 7) as u8).collect();
	let stream = stored_blocks(&data);
	assert_eq!(stream.len(), 65535 + 5, "exactly one stored block");
	assert_eq!(inflate(&zlib_wrap(&stream, &data)).expect("max stored block inflates"), data);
}

#[test]
fn empty_stored_block_yields_empty_output() {
	assert!(inflate(&zlib_stored(&[])).expect("empty stream inflates").is_empty());
}

#[test]
fn fixed_block_of_literals() {
	let raw = fixed_block(&[Token::Literal(0x41), Token::Literal(0x42), Token::Literal(0x43)]);
	assert_eq!(inflate_raw(&raw, &Limits::default()).expect("literals inflate"), b"ABC");
}

#[test]
fn back_reference_repeats_earlier_output() {
	let raw = fixed_block(&[
		Token::Literal(b'A'),
		Token::Literal(b'B'),
		Token::Literal(b'C'),
		Token::Match { length: 3, distance: 3 },
	]);
	assert_eq!(inflate(&zlib_wrap(&raw, b"ABCABC")).expect("match inflates"), b"ABCABC");
}

#[test]
fn overlapping_back_reference_extends_a_run() {
	let raw = fixed_block(&[Token::Literal(b'x'), Token::Literal(b'y'), Token::Match { length: 9, distance: 2 }]);
	assert_eq!(inflate_raw(&raw, &Limits::default()).expect("overlap inflates"), b"xyxyxyxyxyx");
}

#[test]
fn fixed_stream_from_zlib() {
	let expected = b"the quick brown fox jumps over the lazy dog. ".repeat(20);
	assert_eq!(inflate(&hex(&[FIXED_FOX])).expect("fixed stream inflates"), expected);
}

#[test]
fn dynamic_stream_from_zlib() {
	let stream = hex(DYNAMIC_NUMBERS);
	assert_eq!((stream[2] >> 1) & 0b11, 0b10, "fixture starts with a dynamic block");
	assert_eq!(inflate(&stream).expect("dynamic stream inflates"), numbers());
}

#[test]
fn multiple_blocks_concatenate() {
	let mut writer = assetdoc_testkit::BitWriter::new();
	assetdoc_testkit::write_fixed_block(&mut writer, &[Token::Literal(b'h'), Token::Literal(b'i')], false);
	writer.write_bits(1, 1);
	writer.write_bits(0b00, 2);
	writer.write_bytes(&[2, 0, !2, !0, b'!', b'!']);
	let raw = writer.finish();
	assert_eq!(inflate_raw(&raw, &Limits::default()).expect("mixed blocks inflate"), b"hi!!");
}

#[test]
fn missing_trailer_is_tolerated() {
	let mut stream = zlib_stored(b"payload");
	stream.truncate(stream.len() - 4);
	assert_eq!(inflate(&stream).expect("trailer is not verified"), b"payload");
}

#[test]
fn rejects_non_deflate_method() {
	let err = inflate(&[0x77, 0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF]).expect_err("method 7 is invalid");
	assert!(matches!(err, AssetError::ZlibMethod { method: 7 }));
	assert_eq!(err.kind(), ErrorKind::FormatViolation);
}

#[test]
fn rejects_oversized_window() {
	let err = inflate(&[0x88, 0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF]).expect_err("window exponent 8 is invalid");
	assert!(matches!(err, AssetError::ZlibWindow { info: 8 }));
}

#[test]
fn rejects_preset_dictionary() {
	let err = inflate(&[0x78, 0x20, 0, 0, 0, 0]).expect_err("FDICT is unsupported");
	assert_eq!(err.kind(), ErrorKind::UnimplementedFeature);
}

#[test]
fn rejects_reserved_block_type() {
	let err = inflate_raw(&[0b111], &Limits::default()).expect_err("BTYPE 11 is reserved");
	assert!(matches!(err, AssetError::ReservedBlockType { at: 0 }));
}

#[test]
fn rejects_stored_length_mismatch() {
	let err = inflate_raw(&[0x01, 0x05, 0x00, 0x00, 0x00], &Limits::default()).expect_err("NLEN must complement LEN");
	assert!(matches!(err, AssetError::StoredLengthMismatch { len: 5, nlen: 0 }));
}

#[test]
fn rejects_distance_before_start() {
	let raw = fixed_block(&[Token::Literal(b'a'), Token::Match { length: 3, distance: 4 }]);
	let err = inflate_raw(&raw, &Limits::default()).expect_err("distance reaches before output");
	assert!(matches!(err, AssetError::DistanceTooFar { distance: 4, produced: 1 }));
}

#[test]
fn truncated_stream_fails_without_partial_output() {
	let stream = hex(DYNAMIC_NUMBERS);
	let err = inflate(&stream[..stream.len() / 2]).expect_err("half a stream is invalid");
	assert!(matches!(err, AssetError::UnexpectedEof { .. }));
}

#[test]
fn output_ceiling_is_enforced() {
	let limits = Limits {
		max_output_bytes: 100,
		..Limits::default()
	};
	let err = inflate_with(&hex(DYNAMIC_NUMBERS), &limits).expect_err("output exceeds 100 bytes");
	assert!(matches!(err, AssetError::DecompressedTooLarge { limit: 100 }));
	assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
}
