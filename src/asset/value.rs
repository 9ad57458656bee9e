use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::asset::json::unescape;

/// Object payload: unique keys, last write wins.
pub type Object = HashMap<Box<str>, Value>;

/// Tagged JSON datum.
///
/// Strings and object keys hold the escaped text exactly as stored by the
/// parser (non-ASCII re-escaped as `\uXXXX`); use [`Value::as_text`] or
/// [`unescape`] for the decoded form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// `null`.
	Null,
	/// `true` / `false`.
	Bool(bool),
	/// Number literal without `.`, `e`, or `E` that fits in `i64`.
	I64(i64),
	/// Any other number literal.
	F64(f64),
	/// Escaped string body.
	String(Box<str>),
	/// Ordered list.
	List(Vec<Value>),
	/// Keyed map.
	Object(Object),
}

impl Value {
	/// Short type name for diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::I64(_) => "integer",
			Self::F64(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Object(_) => "object",
		}
	}

	/// Returns `true` for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Integer payload.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			_ => None,
		}
	}

	/// Non-negative integer payload as an index or count.
	pub fn as_usize(&self) -> Option<usize> {
		self.as_i64().and_then(|value| usize::try_from(value).ok())
	}

	/// Numeric payload, widening integers.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::I64(value) => Some(*value as f64),
			Self::F64(value) => Some(*value),
			_ => None,
		}
	}

	/// Escaped string payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Unescaped string payload.
	pub fn as_text(&self) -> Option<String> {
		self.as_str().map(unescape)
	}

	/// List payload.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Object payload.
	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(map) => Some(map),
			_ => None,
		}
	}

	/// Object member lookup by escaped key; `None` for non-objects.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_object()?.get(key)
	}

	/// List element lookup; `None` for non-lists.
	pub fn at(&self, index: usize) -> Option<&Value> {
		self.as_list()?.get(index)
	}

	/// Number of children of a list or object, 0 for scalars.
	pub fn len(&self) -> usize {
		match self {
			Self::List(items) => items.len(),
			Self::Object(map) => map.len(),
			_ => 0,
		}
	}

	/// Returns `true` when [`Value::len`] is 0.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(value) => serializer.serialize_bool(*value),
			Self::I64(value) => serializer.serialize_i64(*value),
			Self::F64(value) => serializer.serialize_f64(*value),
			Self::String(value) => serializer.serialize_str(&unescape(value)),
			Self::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Object(map) => {
				let mut entries: Vec<_> = map.iter().collect();
				entries.sort_by(|a, b| a.0.cmp(b.0));

				let mut out = serializer.serialize_map(Some(entries.len()))?;
				for (key, value) in entries {
					out.serialize_entry(&unescape(key), value)?;
				}
				out.end()
			}
		}
	}
}

#[cfg(test)]
mod tests;
