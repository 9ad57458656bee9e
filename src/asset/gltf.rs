use std::path::Path;

use log::debug;

use crate::asset::{AssetError, Result, Value};

/// Accessor component encoding (`componentType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
	/// 5120
	I8,
	/// 5121
	U8,
	/// 5122
	I16,
	/// 5123
	U16,
	/// 5125
	U32,
	/// 5126
	F32,
}

impl ComponentType {
	/// Map a glTF `componentType` code.
	pub fn from_code(code: i64) -> Option<Self> {
		Some(match code {
			5120 => Self::I8,
			5121 => Self::U8,
			5122 => Self::I16,
			5123 => Self::U16,
			5125 => Self::U32,
			5126 => Self::F32,
			_ => return None,
		})
	}

	/// Size of one component in bytes.
	pub fn size(self) -> usize {
		match self {
			Self::I8 | Self::U8 => 1,
			Self::I16 | Self::U16 => 2,
			Self::U32 | Self::F32 => 4,
		}
	}
}

/// Accessor element shape (`type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
	/// One component.
	Scalar,
	/// Two components.
	Vec2,
	/// Three components.
	Vec3,
	/// Four components.
	Vec4,
	/// 2x2 matrix.
	Mat2,
	/// 3x3 matrix.
	Mat3,
	/// 4x4 matrix.
	Mat4,
}

impl ElementType {
	/// Map a glTF `type` string.
	pub fn from_name(name: &str) -> Option<Self> {
		Some(match name {
			"SCALAR" => Self::Scalar,
			"VEC2" => Self::Vec2,
			"VEC3" => Self::Vec3,
			"VEC4" => Self::Vec4,
			"MAT2" => Self::Mat2,
			"MAT3" => Self::Mat3,
			"MAT4" => Self::Mat4,
			_ => return None,
		})
	}

	/// Number of components per element.
	pub fn components(self) -> usize {
		match self {
			Self::Scalar => 1,
			Self::Vec2 => 2,
			Self::Vec3 => 3,
			Self::Vec4 | Self::Mat2 => 4,
			Self::Mat3 => 9,
			Self::Mat4 => 16,
		}
	}
}

/// Byte range of one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferView {
	/// Index into [`Gltf::buffers`].
	pub buffer: usize,
	/// Length of the view in bytes.
	pub byte_length: usize,
	/// Start of the view inside its buffer.
	pub byte_offset: usize,
	/// Distance between consecutive elements, when interleaved.
	pub byte_stride: Option<usize>,
	/// GPU binding hint (34962 vertex, 34963 index).
	pub target: Option<i64>,
}

/// Typed view over a buffer view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
	/// Index into [`Gltf::buffer_views`].
	pub buffer_view: usize,
	/// Offset relative to the start of the buffer view.
	pub byte_offset: usize,
	/// Number of elements.
	pub count: usize,
	/// Component encoding.
	pub component_type: ComponentType,
	/// Element shape.
	pub element_type: ElementType,
}

impl Accessor {
	/// Size of one tightly packed element in bytes.
	pub fn element_size(&self) -> usize {
		self.component_type.size() * self.element_type.components()
	}
}

/// Drawable part of a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
	/// `attributes.POSITION` accessor.
	pub position: usize,
	/// `attributes.NORMAL` accessor.
	pub normal: Option<usize>,
	/// `attributes.TANGENT` accessor.
	pub tangent: Option<usize>,
	/// Index accessor.
	pub indices: Option<usize>,
}

/// Mesh made of one or more primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
	/// Primitives in document order.
	pub primitives: Vec<Primitive>,
}

/// glTF document with its buffers loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gltf {
	/// Raw buffer contents.
	pub buffers: Vec<Vec<u8>>,
	/// Buffer views.
	pub buffer_views: Vec<BufferView>,
	/// Accessors.
	pub accessors: Vec<Accessor>,
	/// Meshes.
	pub meshes: Vec<Mesh>,
	/// Default scene index.
	pub scene: usize,
}

impl Gltf {
	/// Extract a document, resolving buffer URIs against `base_dir`.
	pub fn from_value(root: &Value, base_dir: &Path) -> Result<Self> {
		Self::from_value_with(root, |uri| {
			let path = base_dir.join(uri);
			debug!("gltf: loading buffer {}", path.display());
			Ok(std::fs::read(path)?)
		})
	}

	/// Extract a document, loading each relative buffer URI through `load`.
	pub fn from_value_with(root: &Value, mut load: impl FnMut(&str) -> Result<Vec<u8>>) -> Result<Self> {
		if root.as_object().is_none() {
			return Err(AssetError::GltfInvalid {
				context: "document",
				field: "root",
				expected: "object",
			});
		}

		let mut buffers = Vec::new();
		for (index, entry) in list(root, "buffers")?.iter().enumerate() {
			let declared = usize_field(entry, "buffers", "byteLength")?;
			let uri = field(entry, "buffers", "uri")?.as_text().ok_or(AssetError::GltfInvalid {
				context: "buffers",
				field: "uri",
				expected: "string",
			})?;
			if uri.starts_with("data:") {
				return Err(AssetError::Unimplemented { feature: "data URI buffers" });
			}

			let bytes = load(&uri)?;
			if bytes.len() != declared {
				return Err(AssetError::GltfBufferLength {
					index,
					declared,
					actual: bytes.len(),
				});
			}
			buffers.push(bytes);
		}

		let mut buffer_views = Vec::new();
		for entry in list(root, "bufferViews")? {
			let view = BufferView {
				buffer: usize_field(entry, "bufferViews", "buffer")?,
				byte_length: usize_field(entry, "bufferViews", "byteLength")?,
				byte_offset: opt_usize_field(entry, "bufferViews", "byteOffset")?.unwrap_or(0),
				byte_stride: opt_usize_field(entry, "bufferViews", "byteStride")?,
				target: entry.get("target").and_then(Value::as_i64),
			};
			check_index("buffer", view.buffer, buffers.len())?;
			buffer_views.push(view);
		}

		let mut accessors = Vec::new();
		for entry in list(root, "accessors")? {
			if entry.get("sparse").is_some() {
				return Err(AssetError::Unimplemented { feature: "sparse accessors" });
			}
			let accessor = Accessor {
				buffer_view: usize_field(entry, "accessors", "bufferView")?,
				byte_offset: opt_usize_field(entry, "accessors", "byteOffset")?.unwrap_or(0),
				count: usize_field(entry, "accessors", "count")?,
				component_type: field(entry, "accessors", "componentType")?
					.as_i64()
					.and_then(ComponentType::from_code)
					.ok_or(AssetError::GltfInvalid {
						context: "accessors",
						field: "componentType",
						expected: "one of 5120, 5121, 5122, 5123, 5125, 5126",
					})?,
				element_type: field(entry, "accessors", "type")?
					.as_str()
					.and_then(ElementType::from_name)
					.ok_or(AssetError::GltfInvalid {
						context: "accessors",
						field: "type",
						expected: "SCALAR, VEC2, VEC3, VEC4, MAT2, MAT3 or MAT4",
					})?,
			};
			check_index("bufferView", accessor.buffer_view, buffer_views.len())?;
			accessors.push(accessor);
		}

		let mut meshes = Vec::new();
		for entry in list(root, "meshes")? {
			let mut primitives = Vec::new();
			for primitive in list(entry, "primitives")? {
				let attributes = field(primitive, "primitive", "attributes")?;
				let primitive = Primitive {
					position: usize_field(attributes, "attributes", "POSITION")?,
					normal: opt_usize_field(attributes, "attributes", "NORMAL")?,
					tangent: opt_usize_field(attributes, "attributes", "TANGENT")?,
					indices: opt_usize_field(primitive, "primitive", "indices")?,
				};
				for index in [Some(primitive.position), primitive.normal, primitive.tangent, primitive.indices]
					.into_iter()
					.flatten()
				{
					check_index("accessor", index, accessors.len())?;
				}
				primitives.push(primitive);
			}
			meshes.push(Mesh { primitives });
		}

		let scene = opt_usize_field(root, "document", "scene")?.unwrap_or(0);
		debug!(
			"gltf: {} buffers, {} views, {} accessors, {} meshes, scene {scene}",
			buffers.len(),
			buffer_views.len(),
			accessors.len(),
			meshes.len()
		);

		Ok(Self {
			buffers,
			buffer_views,
			accessors,
			meshes,
			scene,
		})
	}

	/// Accessor `index`, range-checked.
	pub fn accessor(&self, index: usize) -> Result<&Accessor> {
		self.accessors.get(index).ok_or(AssetError::GltfIndex {
			kind: "accessor",
			index,
			count: self.accessors.len(),
		})
	}

	/// Byte slice of every element of accessor `index`, honoring `byteStride`.
	pub fn accessor_elements(&self, index: usize) -> Result<Vec<&[u8]>> {
		let accessor = self.accessor(index)?;
		let view = self.buffer_views.get(accessor.buffer_view).ok_or(AssetError::GltfIndex {
			kind: "bufferView",
			index: accessor.buffer_view,
			count: self.buffer_views.len(),
		})?;
		let buffer = self.buffers.get(view.buffer).ok_or(AssetError::GltfIndex {
			kind: "buffer",
			index: view.buffer,
			count: self.buffers.len(),
		})?;

		let size = accessor.element_size();
		let stride = view.byte_stride.unwrap_or(size);
		let view_end = view.byte_offset.saturating_add(view.byte_length).min(buffer.len());
		let start = view.byte_offset.saturating_add(accessor.byte_offset);
		let need = match accessor.count {
			0 => start,
			count => start.saturating_add(stride.saturating_mul(count - 1)).saturating_add(size),
		};
		if need > view_end {
			return Err(AssetError::GltfAccessorBounds { index, need, have: view_end });
		}

		Ok((0..accessor.count)
			.map(|element| {
				let at = start + element * stride;
				&buffer[at..at + size]
			})
			.collect())
	}
}

/// Vertex positions and triangle indices of one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
	/// `POSITION` attribute.
	pub positions: Vec<[f32; 3]>,
	/// Indices widened to `u32`; sequential when the primitive has none.
	pub indices: Vec<u32>,
}

impl Model {
	/// Extract positions and indices of `meshes[mesh].primitives[primitive]`.
	pub fn from_gltf(gltf: &Gltf, mesh: usize, primitive: usize) -> Result<Self> {
		check_index("mesh", mesh, gltf.meshes.len())?;
		let primitives = &gltf.meshes[mesh].primitives;
		check_index("primitive", primitive, primitives.len())?;
		let primitive = &primitives[primitive];

		let accessor = gltf.accessor(primitive.position)?;
		if accessor.component_type != ComponentType::F32 || accessor.element_type != ElementType::Vec3 {
			return Err(AssetError::GltfInvalid {
				context: "attributes",
				field: "POSITION",
				expected: "VEC3 of FLOAT",
			});
		}
		let positions: Vec<[f32; 3]> = gltf
			.accessor_elements(primitive.position)?
			.into_iter()
			.map(|bytes| [read_f32(bytes, 0), read_f32(bytes, 4), read_f32(bytes, 8)])
			.collect();

		let indices = match primitive.indices {
			Some(index) => {
				let accessor = gltf.accessor(index)?;
				if accessor.element_type != ElementType::Scalar {
					return Err(invalid_indices());
				}
				let elements = gltf.accessor_elements(index)?;
				match accessor.component_type {
					ComponentType::U8 => elements.into_iter().map(|bytes| u32::from(bytes[0])).collect(),
					ComponentType::U16 => elements
						.into_iter()
						.map(|bytes| u32::from(u16::from_le_bytes([bytes[0], bytes[1]])))
						.collect(),
					ComponentType::U32 => elements
						.into_iter()
						.map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
						.collect(),
					_ => return Err(invalid_indices()),
				}
			}
			None => sequential_indices(positions.len())?,
		};

		Ok(Self { positions, indices })
	}
}

/// `0..count` as u32 indices, for primitives drawn without an index accessor.
fn sequential_indices(count: usize) -> Result<Vec<u32>> {
	let count = u32::try_from(count).map_err(|_| AssetError::GltfInvalid {
		context: "primitive",
		field: "POSITION",
		expected: "at most u32::MAX vertices for non-indexed drawing",
	})?;
	Ok((0..count).collect())
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
	f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn invalid_indices() -> AssetError {
	AssetError::GltfInvalid {
		context: "primitive",
		field: "indices",
		expected: "SCALAR of UNSIGNED_BYTE, UNSIGNED_SHORT or UNSIGNED_INT",
	}
}

fn field<'v>(object: &'v Value, context: &'static str, name: &'static str) -> Result<&'v Value> {
	object.get(name).ok_or(AssetError::GltfMissing { context, field: name })
}

fn usize_field(object: &Value, context: &'static str, name: &'static str) -> Result<usize> {
	opt_usize_field(object, context, name)?.ok_or(AssetError::GltfMissing { context, field: name })
}

fn opt_usize_field(object: &Value, context: &'static str, name: &'static str) -> Result<Option<usize>> {
	match object.get(name) {
		None => Ok(None),
		Some(value) => value.as_usize().map(Some).ok_or(AssetError::GltfInvalid {
			context,
			field: name,
			expected: "non-negative integer",
		}),
	}
}

/// Top-level array property; absent means empty.
fn list<'v>(object: &'v Value, name: &'static str) -> Result<&'v [Value]> {
	match object.get(name) {
		None => Ok(&[]),
		Some(value) => value.as_list().ok_or(AssetError::GltfInvalid {
			context: "document",
			field: name,
			expected: "array",
		}),
	}
}

fn check_index(kind: &'static str, index: usize, count: usize) -> Result<()> {
	if index >= count {
		return Err(AssetError::GltfIndex { kind, index, count });
	}
	Ok(())
}

#[cfg(test)]
mod tests;
