use assetdoc_testkit::{
	PNG_SIGNATURE, Token, filter_none, fixed_block, ihdr, png_chunk, png_from_scanlines, png_from_zlib, png_unfiltered, zlib_stored,
	zlib_wrap,
};

use crate::asset::{AssetError, ErrorKind, Limits, decode_png, decode_png_with, paeth, unfilter};

const CHECKER: [u8; 16] = [
	255, 0, 0, 255, 0, 255, 0, 255, //
	0, 0, 255, 255, 255, 255, 255, 128,
];

fn png_with_header(header: &[u8]) -> Vec<u8> {
	let mut out = PNG_SIGNATURE.to_vec();
	out.extend(png_chunk(b"IHDR", header));
	out.extend(png_chunk(b"IDAT", &zlib_stored(&filter_none(1, &[0; 4]))));
	out.extend(png_chunk(b"IEND", &[]));
	out
}

#[test]
fn decodes_unfiltered_rgba() {
	let image = decode_png(&png_unfiltered(2, 2, &CHECKER)).expect("decode png");
	assert_eq!((image.width, image.height), (2, 2));
	assert_eq!(image.pixels, CHECKER);
}

#[test]
fn joins_split_idat_chunks() {
	let bytes = png_from_scanlines(2, 2, &filter_none(2, &CHECKER), 3);
	let image = decode_png(&bytes).expect("decode png");
	assert_eq!(image.pixels, CHECKER);
}

#[test]
fn decodes_fixed_huffman_image_data() {
	// Two 2-pixel rows; the second repeats the first through a back-reference.
	let row = filter_none(2, &CHECKER[..8]);
	let mut scanlines = row.clone();
	scanlines.extend_from_slice(&row);
	let mut tokens: Vec<Token> = row.iter().map(|byte| Token::Literal(*byte)).collect();
	tokens.push(Token::Match { length: 9, distance: 9 });

	let bytes = png_from_zlib(2, 2, &zlib_wrap(&fixed_block(&tokens), &scanlines), 2);
	let image = decode_png(&bytes).expect("decode png");
	assert_eq!(image.pixels[..8], CHECKER[..8]);
	assert_eq!(image.pixels[8..], CHECKER[..8]);
}

#[test]
fn none_filter_is_identity() {
	let mut data = vec![0, 1, 2, 3, 4, 5, 6, 7, 8];
	unfilter(&mut data, 2, 1, 4).expect("unfilter");
	assert_eq!(data, [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn sub_filter_adds_left_neighbor_with_wrap() {
	let mut data = vec![1, 10, 20, 30, 200, 1, 2, 3, 100];
	unfilter(&mut data, 2, 1, 4).expect("unfilter");
	assert_eq!(data, [10, 20, 30, 200, 11, 22, 33, 44]);
}

#[test]
fn up_and_average_use_previous_row() {
	let mut up = vec![0, 1, 2, 3, 4, 2, 10, 10, 10, 10];
	unfilter(&mut up, 1, 2, 4).expect("unfilter up");
	assert_eq!(up, [1, 2, 3, 4, 11, 12, 13, 14]);

	let mut average = vec![0, 10, 20, 30, 40, 3, 5, 5, 5, 5];
	unfilter(&mut average, 1, 2, 4).expect("unfilter average");
	assert_eq!(average, [10, 20, 30, 40, 10, 15, 20, 25]);
}

#[test]
fn paeth_on_first_row_matches_sub() {
	let mut data = vec![4, 10, 20, 30, 40, 1, 2, 3, 4];
	unfilter(&mut data, 2, 1, 4).expect("unfilter");
	assert_eq!(data, [10, 20, 30, 40, 11, 22, 33, 44]);
}

#[test]
fn paeth_on_first_column_matches_up() {
	let mut data = vec![0, 7, 8, 9, 10, 4, 1, 1, 1, 1];
	unfilter(&mut data, 1, 2, 4).expect("unfilter");
	assert_eq!(data, [7, 8, 9, 10, 8, 9, 10, 11]);
}

#[test]
fn paeth_breaks_ties_left_then_up() {
	assert_eq!(paeth(1, 1, 1), 1);
	assert_eq!(paeth(5, 5, 10), 5);
	assert_eq!(paeth(10, 20, 10), 20);
	assert_eq!(paeth(3, 10, 7), 7);
	assert_eq!(paeth(0, 0, 0), 0);
}

#[test]
fn rejects_unknown_filter_type() {
	let mut data = vec![0, 1, 2, 3, 4, 5, 9, 9, 9, 9];
	let err = unfilter(&mut data, 1, 2, 4).expect_err("filter 5");
	assert!(matches!(err, AssetError::PngFilterType { row: 1, filter: 5 }));
}

#[test]
fn rejects_short_image_data() {
	let scanlines = filter_none(1, &[0; 8]);
	let mut bytes = PNG_SIGNATURE.to_vec();
	bytes.extend(png_chunk(b"IHDR", &ihdr(1, 3, 8, 6, 0)));
	bytes.extend(png_chunk(b"IDAT", &zlib_stored(&scanlines)));
	bytes.extend(png_chunk(b"IEND", &[]));

	let err = decode_png(&bytes).expect_err("two rows for three");
	assert!(matches!(err, AssetError::PngDataTooShort { need: 15, have: 10 }));
}

#[test]
fn rejects_bad_signature() {
	let err = decode_png(b"GIF89a\0\0rest").expect_err("not a png");
	assert!(matches!(err, AssetError::PngSignature { .. }));
	assert_eq!(err.kind(), ErrorKind::FormatViolation);
}

#[test]
fn first_chunk_must_be_header() {
	let mut bytes = PNG_SIGNATURE.to_vec();
	bytes.extend(png_chunk(b"tEXt", b"a\0b"));
	bytes.extend(png_chunk(b"IHDR", &ihdr(1, 1, 8, 6, 0)));
	let err = decode_png(&bytes).expect_err("tEXt first");
	assert!(matches!(err, AssetError::PngFirstChunk { got } if &got == b"tEXt"));
}

#[test]
fn rejects_unsupported_header_fields() {
	let cases: [(Vec<u8>, fn(&AssetError) -> bool); 5] = [
		(ihdr(0, 1, 8, 6, 0), |err| matches!(err, AssetError::PngZeroDimension { width: 0, height: 1 })),
		(ihdr(1, 1, 16, 6, 0), |err| matches!(err, AssetError::PngBitDepth { depth: 16 })),
		(ihdr(1, 1, 8, 2, 0), |err| matches!(err, AssetError::PngColorType { color_type: 2 })),
		(ihdr(1, 1, 8, 6, 1), |err| matches!(err, AssetError::PngInterlaced)),
		(ihdr(1, 1, 8, 6, 0)[..12].to_vec(), |err| matches!(err, AssetError::PngHeaderLength { len: 12 })),
	];
	for (header, check) in cases {
		let err = decode_png(&png_with_header(&header)).expect_err("bad header");
		assert!(check(&err), "unexpected error: {err:?}");
	}
}

#[test]
fn interlaced_images_are_unimplemented() {
	let err = decode_png(&png_with_header(&ihdr(1, 1, 8, 6, 1))).expect_err("adam7");
	assert_eq!(err.kind(), ErrorKind::UnimplementedFeature);
}

#[test]
fn missing_end_chunk_is_rejected() {
	let mut bytes = png_unfiltered(2, 2, &CHECKER);
	bytes.truncate(bytes.len() - 12);
	let err = decode_png(&bytes).expect_err("no IEND");
	assert!(matches!(err, AssetError::PngMissingEnd));
}

#[test]
fn pixel_ceiling_applies_before_inflate() {
	let limits = Limits {
		max_image_pixels: 3,
		..Limits::default()
	};
	let err = decode_png_with(&png_unfiltered(2, 2, &CHECKER), &limits).expect_err("4 pixels over 3");
	assert!(matches!(err, AssetError::PngTooLarge { width: 2, height: 2, limit: 3 }));
	assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
}
