//! Single-pass JSON parser driven one code point at a time.
//!
//! The parser keeps two stacks: a parse stack of grammar states (what the
//! next character may be) and a container stack of the objects and arrays
//! being filled. Every `Object`/`Array` state on the parse stack has exactly
//! one live container, so closing a bracket pops both together.

use std::fmt::Write as _;

use log::{trace, warn};

use crate::asset::value::Object;
use crate::asset::{AssetError, Limits, Result, Value};

/// Manual UTF-8 decoding.
pub mod utf8;

use utf8::{BOM, decode_code_point};

/// Parse a JSON document with default limits.
pub fn parse_json(bytes: &[u8]) -> Result<Value> {
	parse_json_with(bytes, &Limits::default())
}

/// Parse a JSON document.
///
/// A leading byte order mark is skipped with a warning. Any syntax error,
/// malformed UTF-8, or exceeded limit aborts the parse without a partial tree.
pub fn parse_json_with(bytes: &[u8], limits: &Limits) -> Result<Value> {
	let mut at = 0;
	if bytes.starts_with(&BOM) {
		warn!("json: skipping UTF-8 byte order mark");
		at = BOM.len();
	} else if bytes.starts_with(&[0xFE, 0xFF]) {
		warn!("json: skipping UTF-16 byte order mark");
		at = 2;
	}

	let mut parser = Parser::new(limits);
	while at < bytes.len() {
		let (ch, len) = decode_code_point(bytes, at)?;
		parser.step(ch, at)?;
		at += len;
	}
	parser.finish()
}

/// Decode the escaped form stored in [`Value::String`] and object keys.
///
/// Unpaired surrogate escapes become `U+FFFD`.
pub fn unescape(escaped: &str) -> String {
	let mut out = String::with_capacity(escaped.len());
	let mut chars = escaped.chars();
	while let Some(ch) = chars.next() {
		if ch != '\\' {
			out.push(ch);
			continue;
		}
		match chars.next() {
			Some('b') => out.push('\u{8}'),
			Some('f') => out.push('\u{c}'),
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('t') => out.push('\t'),
			Some('u') => {
				let Some(unit) = read_hex4(&mut chars) else {
					out.push(char::REPLACEMENT_CHARACTER);
					continue;
				};
				if (0xD800..0xDC00).contains(&unit) {
					let mut look = chars.clone();
					let low = match (look.next(), look.next()) {
						(Some('\\'), Some('u')) => read_hex4(&mut look).filter(|low| (0xDC00..0xE000).contains(low)),
						_ => None,
					};
					if let Some(low) = low {
						chars = look;
						let code_point = 0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
						out.push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
						continue;
					}
				}
				out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
			}
			Some(other) => out.push(other),
			None => out.push('\\'),
		}
	}
	out
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
	let mut value = 0;
	for _ in 0..4 {
		value = (value << 4) | chars.next()?.to_digit(16)?;
	}
	Some(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectPhase {
	KeyOrEnd,
	Key,
	Colon,
	Value,
	CommaOrEnd,
}

impl ObjectPhase {
	fn expected(self) -> &'static str {
		match self {
			Self::KeyOrEnd => "object key or '}'",
			Self::Key => "object key",
			Self::Colon => "':'",
			Self::Value => "value",
			Self::CommaOrEnd => "',' or '}'",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayPhase {
	ValueOrEnd,
	Value,
	CommaOrEnd,
}

impl ArrayPhase {
	fn expected(self) -> &'static str {
		match self {
			Self::ValueOrEnd => "value or ']'",
			Self::Value => "value",
			Self::CommaOrEnd => "',' or ']'",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
	None,
	Backslash,
	Hex(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberPhase {
	Minus,
	Zero,
	Integer,
	Point,
	Fraction,
	Exponent,
	ExponentSign,
	ExponentDigits,
}

impl NumberPhase {
	fn start(ch: char) -> Option<Self> {
		match ch {
			'-' => Some(Self::Minus),
			'0' => Some(Self::Zero),
			'1'..='9' => Some(Self::Integer),
			_ => None,
		}
	}

	fn next(self, ch: char) -> Option<Self> {
		Some(match (self, ch) {
			(Self::Minus, '0') => Self::Zero,
			(Self::Minus | Self::Integer, '0'..='9') => Self::Integer,
			(Self::Zero | Self::Integer, '.') => Self::Point,
			(Self::Point | Self::Fraction, '0'..='9') => Self::Fraction,
			(Self::Zero | Self::Integer | Self::Fraction, 'e' | 'E') => Self::Exponent,
			(Self::Exponent, '+' | '-') => Self::ExponentSign,
			(Self::Exponent | Self::ExponentSign | Self::ExponentDigits, '0'..='9') => Self::ExponentDigits,
			_ => return None,
		})
	}

	fn accepting(self) -> bool {
		matches!(self, Self::Zero | Self::Integer | Self::Fraction | Self::ExponentDigits)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Object(ObjectPhase),
	Array(ArrayPhase),
	String { key: bool, escape: Escape },
	Number(NumberPhase),
	Literal { word: &'static str, matched: usize },
}

impl State {
	fn expected_at_end(self) -> &'static str {
		match self {
			Self::Object(phase) => phase.expected(),
			Self::Array(phase) => phase.expected(),
			Self::String { .. } => "closing '\"'",
			Self::Number(_) => "digit",
			Self::Literal { word, .. } => word,
		}
	}
}

#[derive(Debug)]
enum Container {
	Object { map: Object, key: Option<Box<str>> },
	Array(Vec<Value>),
}

struct Parser<'a> {
	limits: &'a Limits,
	states: Vec<State>,
	containers: Vec<Container>,
	scratch: String,
	root: Option<Value>,
}

impl<'a> Parser<'a> {
	fn new(limits: &'a Limits) -> Self {
		Self {
			limits,
			states: Vec::new(),
			containers: Vec::new(),
			scratch: String::new(),
			root: None,
		}
	}

	fn step(&mut self, ch: char, at: usize) -> Result<()> {
		match self.states.last().copied() {
			Some(State::String { key, escape }) => return self.string_char(key, escape, ch, at),
			Some(State::Literal { word, matched }) => return self.literal_char(word, matched, ch, at),
			Some(State::Number(phase)) => {
				if let Some(next) = phase.next(ch) {
					self.push_scratch(ch, at)?;
					self.set_top(State::Number(next));
					return Ok(());
				}
				self.close_number(phase)?;
			}
			_ => {}
		}

		if matches!(ch, ' ' | '\t' | '\n' | '\r') {
			return Ok(());
		}
		self.structural(ch, at)
	}

	fn structural(&mut self, ch: char, at: usize) -> Result<()> {
		match self.states.last().copied() {
			None if self.root.is_some() => Err(AssetError::JsonTrailingValue { at }),
			None => self.begin_value(ch, at),
			Some(State::Object(phase)) => match (phase, ch) {
				(ObjectPhase::KeyOrEnd | ObjectPhase::Key, '"') => {
					self.set_top(State::Object(ObjectPhase::Colon));
					self.states.push(State::String {
						key: true,
						escape: Escape::None,
					});
					Ok(())
				}
				(ObjectPhase::KeyOrEnd | ObjectPhase::CommaOrEnd, '}') => self.close_container(ch, at),
				(ObjectPhase::Colon, ':') => {
					self.set_top(State::Object(ObjectPhase::Value));
					Ok(())
				}
				(ObjectPhase::Value, _) => {
					self.set_top(State::Object(ObjectPhase::CommaOrEnd));
					self.begin_value(ch, at)
				}
				(ObjectPhase::CommaOrEnd, ',') => {
					self.set_top(State::Object(ObjectPhase::Key));
					Ok(())
				}
				_ => Err(unexpected(ch, at, phase.expected())),
			},
			Some(State::Array(phase)) => match (phase, ch) {
				(ArrayPhase::ValueOrEnd | ArrayPhase::CommaOrEnd, ']') => self.close_container(ch, at),
				(ArrayPhase::ValueOrEnd | ArrayPhase::Value, _) => {
					self.set_top(State::Array(ArrayPhase::CommaOrEnd));
					self.begin_value(ch, at)
				}
				(ArrayPhase::CommaOrEnd, ',') => {
					self.set_top(State::Array(ArrayPhase::Value));
					Ok(())
				}
				_ => Err(unexpected(ch, at, phase.expected())),
			},
			// Scalar states consume or close before reaching here.
			Some(state) => Err(unexpected(ch, at, state.expected_at_end())),
		}
	}

	fn begin_value(&mut self, ch: char, at: usize) -> Result<()> {
		match ch {
			'{' => self.open_container(
				State::Object(ObjectPhase::KeyOrEnd),
				Container::Object {
					map: Object::new(),
					key: None,
				},
			),
			'[' => self.open_container(State::Array(ArrayPhase::ValueOrEnd), Container::Array(Vec::new())),
			'"' => {
				self.states.push(State::String {
					key: false,
					escape: Escape::None,
				});
				Ok(())
			}
			't' | 'f' | 'n' => {
				let word = match ch {
					't' => "true",
					'f' => "false",
					_ => "null",
				};
				self.states.push(State::Literal { word, matched: 1 });
				Ok(())
			}
			_ => {
				let Some(phase) = NumberPhase::start(ch) else {
					return Err(unexpected(ch, at, "value"));
				};
				self.push_scratch(ch, at)?;
				self.states.push(State::Number(phase));
				Ok(())
			}
		}
	}

	fn string_char(&mut self, key: bool, escape: Escape, ch: char, at: usize) -> Result<()> {
		match escape {
			Escape::None => match ch {
				'"' => return self.close_string(key),
				'\\' => {
					self.push_scratch(ch, at)?;
					self.set_top(State::String {
						key,
						escape: Escape::Backslash,
					});
				}
				'\u{0}'..='\u{1f}' => return Err(unexpected(ch, at, "string character")),
				_ if ch.is_ascii() => self.push_scratch(ch, at)?,
				_ => {
					let mut units = [0_u16; 2];
					for unit in ch.encode_utf16(&mut units) {
						for escaped in ['\\', 'u'] {
							self.push_scratch(escaped, at)?;
						}
						if self.scratch.len() + 4 > self.limits.max_json_scratch {
							return Err(AssetError::JsonLiteralTooLong {
								at,
								max: self.limits.max_json_scratch,
							});
						}
						let _ = write!(self.scratch, "{unit:04X}");
					}
				}
			},
			Escape::Backslash => {
				let next = match ch {
					'"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => Escape::None,
					'u' => Escape::Hex(0),
					_ => return Err(AssetError::JsonInvalidEscape { at, found: ch }),
				};
				self.push_scratch(ch, at)?;
				self.set_top(State::String { key, escape: next });
			}
			Escape::Hex(count) => {
				if !ch.is_ascii_hexdigit() {
					return Err(AssetError::JsonInvalidEscape { at, found: ch });
				}
				self.push_scratch(ch, at)?;
				let next = if count == 3 { Escape::None } else { Escape::Hex(count + 1) };
				self.set_top(State::String { key, escape: next });
			}
		}
		Ok(())
	}

	fn literal_char(&mut self, word: &'static str, matched: usize, ch: char, at: usize) -> Result<()> {
		if word.as_bytes().get(matched).copied() != u8::try_from(ch).ok() {
			return Err(unexpected(ch, at, word));
		}
		if matched + 1 < word.len() {
			self.set_top(State::Literal { word, matched: matched + 1 });
			return Ok(());
		}

		self.states.pop();
		let value = match word {
			"true" => Value::Bool(true),
			"false" => Value::Bool(false),
			_ => Value::Null,
		};
		self.deliver(value);
		Ok(())
	}

	fn close_string(&mut self, key: bool) -> Result<()> {
		self.states.pop();
		let text = std::mem::take(&mut self.scratch).into_boxed_str();
		if !key {
			self.deliver(Value::String(text));
			return Ok(());
		}

		if let Some(Container::Object { key: pending, .. }) = self.containers.last_mut() {
			*pending = Some(text);
		}
		Ok(())
	}

	fn close_number(&mut self, phase: NumberPhase) -> Result<()> {
		self.states.pop();
		let text = std::mem::take(&mut self.scratch);
		if !phase.accepting() {
			return Err(AssetError::JsonInvalidNumber { text });
		}

		let value = if text.contains(['.', 'e', 'E']) {
			text.parse().map(Value::F64).ok()
		} else {
			// Integers past i64 keep their magnitude as floats.
			text.parse().map(Value::I64).or_else(|_| text.parse().map(Value::F64)).ok()
		};
		// Magnitudes past f64 range are rejected rather than stored as infinity.
		let value = value
			.filter(|value| !matches!(value, Value::F64(float) if !float.is_finite()))
			.ok_or(AssetError::JsonInvalidNumber { text })?;
		self.deliver(value);
		Ok(())
	}

	fn open_container(&mut self, state: State, container: Container) -> Result<()> {
		if self.containers.len() >= self.limits.max_json_depth {
			return Err(AssetError::JsonDepthExceeded {
				max: self.limits.max_json_depth,
			});
		}
		self.states.push(state);
		self.containers.push(container);
		trace!("json: open {state:?} depth={}", self.containers.len());
		Ok(())
	}

	fn close_container(&mut self, ch: char, at: usize) -> Result<()> {
		self.states.pop();
		let container = self.containers.pop().ok_or(unexpected(ch, at, "open container"))?;
		trace!("json: close {ch:?} depth={}", self.containers.len());

		let value = match container {
			Container::Object { map, .. } => Value::Object(map),
			Container::Array(items) => Value::List(items),
		};
		self.deliver(value);
		Ok(())
	}

	/// Attach a finished value to the innermost container, or make it the root.
	fn deliver(&mut self, value: Value) {
		debug_assert_eq!(
			self.containers.len(),
			self.states.iter().filter(|state| matches!(state, State::Object(_) | State::Array(_))).count()
		);
		match self.containers.last_mut() {
			None => self.root = Some(value),
			Some(Container::Array(items)) => items.push(value),
			Some(Container::Object { map, key }) => {
				let key = key.take().unwrap_or_default();
				if map.contains_key(&key) {
					warn!("json: duplicate key {key:?}, keeping the last value");
				}
				map.insert(key, value);
			}
		}
	}

	fn push_scratch(&mut self, ch: char, at: usize) -> Result<()> {
		if self.scratch.len() + ch.len_utf8() > self.limits.max_json_scratch {
			return Err(AssetError::JsonLiteralTooLong {
				at,
				max: self.limits.max_json_scratch,
			});
		}
		self.scratch.push(ch);
		Ok(())
	}

	fn set_top(&mut self, state: State) {
		if let Some(top) = self.states.last_mut() {
			*top = state;
		}
	}

	fn finish(mut self) -> Result<Value> {
		if let Some(State::Number(phase)) = self.states.last().copied() {
			self.close_number(phase)?;
		}
		if let Some(state) = self.states.last() {
			return Err(AssetError::JsonUnexpectedEnd {
				expected: state.expected_at_end(),
			});
		}
		self.root.ok_or(AssetError::JsonUnexpectedEnd { expected: "value" })
	}
}

fn unexpected(found: char, at: usize, expected: &'static str) -> AssetError {
	AssetError::JsonUnexpected { at, found, expected }
}
