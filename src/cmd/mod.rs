/// glTF summary command.
pub mod gltf;
/// Stream decompression command.
pub mod inflate;
/// File-level information command.
pub mod info;
/// JSON re-emit command.
pub mod json;
/// PNG decode command.
pub mod png;
/// Shared command helpers.
pub mod util;
