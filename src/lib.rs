//! Public library API for decoding PNG textures, zlib streams, and glTF documents.

/// Byte-stream decoders: inflate, PNG, JSON, and glTF extraction.
pub mod asset;
