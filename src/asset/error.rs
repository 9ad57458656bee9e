use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Coarse failure class of an [`AssetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Input bytes do not follow the format being decoded.
	FormatViolation,
	/// A configured resource ceiling was reached.
	ResourceExhaustion,
	/// Input uses a valid but unsupported feature.
	UnimplementedFeature,
	/// Filesystem failure outside the decoders.
	Io,
}

/// Errors produced while decoding zlib, PNG, JSON, and glTF data.
#[derive(Debug, Error)]
pub enum AssetError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Byte-level read attempted while the bit cursor sat mid-byte.
	#[error("unaligned byte read at offset {at} (bit {bit})")]
	Unaligned {
		/// Byte offset of the cursor.
		at: usize,
		/// Bit position inside that byte.
		bit: u8,
	},

	/// zlib compression method was not DEFLATE.
	#[error("zlib: unsupported compression method {method} (expected 8)")]
	ZlibMethod {
		/// Low nibble of the CMF byte.
		method: u8,
	},
	/// zlib window exponent above 7.
	#[error("zlib: window size exponent {info} too large (max 7)")]
	ZlibWindow {
		/// High nibble of the CMF byte.
		info: u8,
	},
	/// zlib stream requires a preset dictionary.
	#[error("zlib: preset dictionaries are not supported")]
	ZlibPresetDictionary,
	/// Block type `11` is reserved.
	#[error("deflate: reserved block type at offset {at}")]
	ReservedBlockType {
		/// Byte offset of the block header.
		at: usize,
	},
	/// Stored block length check failed.
	#[error("deflate: stored block LEN {len:#06x} does not match NLEN {nlen:#06x}")]
	StoredLengthMismatch {
		/// Declared length.
		len: u16,
		/// Declared one's complement of the length.
		nlen: u16,
	},
	/// Code-length alphabet produced a symbol outside `0..=18`.
	#[error("deflate: invalid code length symbol {symbol}")]
	InvalidCodeLengthSymbol {
		/// Decoded symbol.
		symbol: u16,
	},
	/// Repeat code `16` appeared before any code length.
	#[error("deflate: repeat of previous code length with no previous length")]
	RepeatWithoutPrevious,
	/// Run-length code lengths overflowed `HLIT + HDIST`.
	#[error("deflate: code lengths overflow declared count {declared}")]
	CodeLengthOverflow {
		/// `HLIT + HDIST`.
		declared: usize,
	},
	/// Literal/length symbol outside `0..=285`.
	#[error("deflate: invalid length symbol {symbol}")]
	InvalidLengthSymbol {
		/// Decoded symbol.
		symbol: u16,
	},
	/// Distance symbol outside `0..=29`.
	#[error("deflate: invalid distance symbol {symbol}")]
	InvalidDistanceSymbol {
		/// Decoded symbol.
		symbol: u16,
	},
	/// Back-reference reached before the start of the output.
	#[error("deflate: distance {distance} exceeds produced output {produced}")]
	DistanceTooFar {
		/// Requested distance.
		distance: usize,
		/// Bytes produced so far.
		produced: usize,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},

	/// Code lengths describe more codes than fit their bit lengths.
	#[error("huffman: code lengths are over-subscribed at length {length}")]
	HuffmanOversubscribed {
		/// First code length that overflowed.
		length: u8,
	},
	/// Code length longer than DEFLATE allows.
	#[error("huffman: code length {length} exceeds 15")]
	HuffmanCodeTooLong {
		/// Offending length.
		length: u8,
	},
	/// Bit path ran off the tree.
	#[error("huffman: bit sequence at offset {at} does not name a symbol")]
	HuffmanInvalidCode {
		/// Byte offset where decoding stopped.
		at: usize,
	},
	/// Tree arena hit its node ceiling.
	#[error("huffman: node arena exhausted (max={max})")]
	HuffmanCapacity {
		/// Configured node ceiling.
		max: usize,
	},

	/// File did not start with the PNG signature.
	#[error("png: bad signature {got:02x?}")]
	PngSignature {
		/// First up-to-8 bytes of the stream.
		got: Vec<u8>,
	},
	/// First chunk was not `IHDR`.
	#[error("png: first chunk is {got:?}, expected IHDR")]
	PngFirstChunk {
		/// Chunk type found.
		got: [u8; 4],
	},
	/// `IHDR` chunk had the wrong payload length.
	#[error("png: IHDR length {len} (expected 13)")]
	PngHeaderLength {
		/// Declared length.
		len: u32,
	},
	/// Width or height was zero.
	#[error("png: zero image dimension {width}x{height}")]
	PngZeroDimension {
		/// Declared width.
		width: u32,
		/// Declared height.
		height: u32,
	},
	/// Unsupported bit depth.
	#[error("png: unsupported bit depth {depth} (only 8)")]
	PngBitDepth {
		/// Declared bit depth.
		depth: u8,
	},
	/// Unsupported color type.
	#[error("png: unsupported color type {color_type} (only 6, truecolor with alpha)")]
	PngColorType {
		/// Declared color type.
		color_type: u8,
	},
	/// Compression method byte was not zero.
	#[error("png: invalid compression method {method}")]
	PngCompressionMethod {
		/// Declared method.
		method: u8,
	},
	/// Filter method byte was not zero.
	#[error("png: invalid filter method {method}")]
	PngFilterMethod {
		/// Declared method.
		method: u8,
	},
	/// Interlaced images are not decoded.
	#[error("png: Adam7 interlacing is not supported")]
	PngInterlaced,
	/// Chunk stream ended without `IEND`.
	#[error("png: missing IEND chunk")]
	PngMissingEnd,
	/// A row used a filter type outside `0..=4`.
	#[error("png: unknown filter type {filter} on row {row}")]
	PngFilterType {
		/// Row index.
		row: usize,
		/// Filter type byte.
		filter: u8,
	},
	/// Decompressed scanlines were shorter than the image requires.
	#[error("png: image data too short: need={need}, have={have}")]
	PngDataTooShort {
		/// Required bytes (`height * (1 + stride)`).
		need: usize,
		/// Decompressed bytes available.
		have: usize,
	},
	/// Image pixel count exceeded configured limit.
	#[error("png: image {width}x{height} exceeds pixel limit {limit}")]
	PngTooLarge {
		/// Declared width.
		width: u32,
		/// Declared height.
		height: u32,
		/// Maximum allowed pixels.
		limit: u64,
	},

	/// Byte can never appear in UTF-8.
	#[error("utf-8: invalid byte {byte:#04x} at offset {at}")]
	Utf8InvalidByte {
		/// Byte offset.
		at: usize,
		/// Offending byte.
		byte: u8,
	},
	/// Continuation byte did not look like `10xxxxxx`.
	#[error("utf-8: byte {index} of sequence at offset {at} is not a continuation byte")]
	Utf8Continuation {
		/// Offset of the sequence's lead byte.
		at: usize,
		/// Position within the sequence (1-based).
		index: usize,
	},
	/// Decoded code point outside the range of its sequence length.
	#[error("utf-8: code point {code_point:#x} at offset {at} is out of range for a {len}-byte sequence")]
	Utf8OutOfRange {
		/// Offset of the sequence's lead byte.
		at: usize,
		/// Decoded value.
		code_point: u32,
		/// Sequence length.
		len: usize,
	},
	/// Input ended inside a multi-byte sequence.
	#[error("utf-8: truncated sequence at offset {at}")]
	Utf8Truncated {
		/// Offset of the sequence's lead byte.
		at: usize,
	},

	/// Character not allowed in the current parser state.
	#[error("json: unexpected {found:?} at offset {at}, expected {expected}")]
	JsonUnexpected {
		/// Byte offset.
		at: usize,
		/// Offending character.
		found: char,
		/// What the parser was waiting for.
		expected: &'static str,
	},
	/// Input ended before the document was complete.
	#[error("json: unexpected end of input, expected {expected}")]
	JsonUnexpectedEnd {
		/// What the parser was waiting for.
		expected: &'static str,
	},
	/// Non-whitespace after the root value.
	#[error("json: trailing value at offset {at}")]
	JsonTrailingValue {
		/// Byte offset.
		at: usize,
	},
	/// Backslash followed by an unknown escape letter.
	#[error("json: invalid escape {found:?} at offset {at}")]
	JsonInvalidEscape {
		/// Byte offset.
		at: usize,
		/// Character after the backslash.
		found: char,
	},
	/// Number literal could not be converted.
	#[error("json: invalid number {text:?}")]
	JsonInvalidNumber {
		/// Accumulated literal text.
		text: String,
	},
	/// Containers nested deeper than configured limit.
	#[error("json: nesting depth exceeded (max={max})")]
	JsonDepthExceeded {
		/// Configured depth ceiling.
		max: usize,
	},
	/// String or number literal longer than configured limit.
	#[error("json: literal at offset {at} exceeded {max} bytes")]
	JsonLiteralTooLong {
		/// Byte offset.
		at: usize,
		/// Configured scratch ceiling.
		max: usize,
	},

	/// Required glTF property was absent.
	#[error("gltf: missing property {field} in {context}")]
	GltfMissing {
		/// Object being read.
		context: &'static str,
		/// Property name.
		field: &'static str,
	},
	/// glTF property had the wrong JSON type or an invalid value.
	#[error("gltf: property {field} in {context}: expected {expected}")]
	GltfInvalid {
		/// Object being read.
		context: &'static str,
		/// Property name.
		field: &'static str,
		/// Description of the accepted values.
		expected: &'static str,
	},
	/// Index into a glTF array was out of range.
	#[error("gltf: {kind} index {index} out of range (count={count})")]
	GltfIndex {
		/// Array being indexed.
		kind: &'static str,
		/// Requested index.
		index: usize,
		/// Array length.
		count: usize,
	},
	/// Loaded buffer size differed from `byteLength`.
	#[error("gltf: buffer {index} has {actual} bytes, byteLength says {declared}")]
	GltfBufferLength {
		/// Buffer index.
		index: usize,
		/// Declared `byteLength`.
		declared: usize,
		/// Bytes read from disk.
		actual: usize,
	},
	/// Accessor range reaches past its buffer.
	#[error("gltf: accessor {index} reads past the end of its buffer (need={need}, have={have})")]
	GltfAccessorBounds {
		/// Accessor index.
		index: usize,
		/// Required end offset.
		need: usize,
		/// Buffer length.
		have: usize,
	},
	/// Feature recognized but deliberately not implemented.
	#[error("unimplemented: {feature}")]
	Unimplemented {
		/// Feature name.
		feature: &'static str,
	},
}

impl AssetError {
	/// Classify this error per the decoder failure taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::DecompressedTooLarge { .. }
			| Self::HuffmanCapacity { .. }
			| Self::PngTooLarge { .. }
			| Self::JsonDepthExceeded { .. }
			| Self::JsonLiteralTooLong { .. } => ErrorKind::ResourceExhaustion,
			Self::ZlibPresetDictionary | Self::PngInterlaced | Self::Unimplemented { .. } => ErrorKind::UnimplementedFeature,
			_ => ErrorKind::FormatViolation,
		}
	}
}
