mod bits;
mod error;
mod file;
mod gltf;
mod huffman;
mod inflate;
mod json;
mod limits;
mod png;
mod value;

/// Bit/byte cursor shared by the decoders.
pub use bits::BitCursor;
/// Error, error class, and result aliases.
pub use error::{AssetError, ErrorKind, Result};
/// File-level entry points and format sniffing.
pub use file::{AssetKind, load_gltf, load_gltf_with, load_json, load_json_with, load_png, load_png_with, write_json};
/// glTF field extraction and model types.
pub use gltf::{Accessor, BufferView, ComponentType, ElementType, Gltf, Mesh, Model, Primitive};
/// Canonical Huffman code tree.
pub use huffman::{HuffmanTree, MAX_CODE_LENGTH};
/// zlib/DEFLATE decompression entry points.
pub use inflate::{BlockType, inflate, inflate_raw, inflate_with};
/// Single code point UTF-8 decoder.
pub use json::utf8::decode_code_point;
/// JSON parsing entry points.
pub use json::{parse_json, parse_json_with, unescape};
/// Resource ceilings.
pub use limits::Limits;
/// PNG decoding entry points and unfilter helpers.
pub use png::{FilterType, PNG_SIGNATURE, PngHeader, PngImage, decode_png, decode_png_with, paeth, read_chunks, unfilter};
/// Generic JSON value tree.
pub use value::{Object, Value};
