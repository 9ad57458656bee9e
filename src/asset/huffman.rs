use crate::asset::{AssetError, BitCursor, Result};

/// Longest code length DEFLATE allows.
pub const MAX_CODE_LENGTH: usize = 15;

const ABSENT: u32 = 0;

/// Array-backed binary trie of canonical Huffman codes.
///
/// Node 0 is the root and never appears as a child, so a child index of 0
/// means "absent". Leaves are marked when their code is inserted; in a
/// finished tree a node is a leaf exactly when both children are absent.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
	nodes: Vec<Node>,
	max_nodes: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Node {
	left: u32,
	right: u32,
	symbol: u16,
	leaf: bool,
}

impl Node {
	fn has_children(self) -> bool {
		self.left != ABSENT || self.right != ABSENT
	}
}

impl HuffmanTree {
	/// Build a tree where symbol `i` has code length `lengths[i]`.
	pub fn from_lengths(lengths: &[u8], max_nodes: usize) -> Result<Self> {
		Self::build(lengths, |index| index as u16, max_nodes)
	}

	/// Build a tree assigning `lengths[i]` to `alphabet[i]`.
	///
	/// Lengths of 0 leave the symbol out of the code. Codes are assigned in
	/// canonical order: shorter codes first, equal lengths in input order.
	pub fn from_lengths_with_alphabet(lengths: &[u8], alphabet: &[u16], max_nodes: usize) -> Result<Self> {
		debug_assert!(alphabet.len() >= lengths.len());
		Self::build(lengths, |index| alphabet[index], max_nodes)
	}

	fn build(lengths: &[u8], symbol_at: impl Fn(usize) -> u16, max_nodes: usize) -> Result<Self> {
		let counts = length_counts(lengths)?;
		let mut next_code = next_codes(&counts)?;

		let mut tree = Self {
			nodes: vec![Node::default()],
			max_nodes,
		};
		for (index, &length) in lengths.iter().enumerate() {
			if length == 0 {
				continue;
			}
			let slot = &mut next_code[usize::from(length)];
			let code = *slot;
			*slot += 1;
			tree.insert(code, length, symbol_at(index))?;
		}

		Ok(tree)
	}

	/// Number of allocated nodes, root included.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Walk the tree one bit at a time until a leaf is reached.
	pub fn decode(&self, cursor: &mut BitCursor<'_>) -> Result<u16> {
		let mut current = 0_usize;
		loop {
			let node = self.nodes[current];
			let child = if cursor.read_bit()? == 0 { node.left } else { node.right };
			if child == ABSENT {
				return Err(AssetError::HuffmanInvalidCode { at: cursor.pos() });
			}

			current = child as usize;
			let node = self.nodes[current];
			if node.leaf {
				return Ok(node.symbol);
			}
		}
	}

	/// Insert `code` (its `length` low bits, most significant first).
	fn insert(&mut self, code: u32, length: u8, symbol: u16) -> Result<()> {
		let mut current = 0_usize;
		for shift in (0..length).rev() {
			if self.nodes[current].leaf {
				// A shorter code already ends here.
				return Err(AssetError::HuffmanOversubscribed { length });
			}

			let go_right = (code >> shift) & 1 == 1;
			let existing = if go_right { self.nodes[current].right } else { self.nodes[current].left };
			let next = if existing == ABSENT {
				let fresh = self.alloc()?;
				let node = &mut self.nodes[current];
				if go_right {
					node.right = fresh;
				} else {
					node.left = fresh;
				}
				fresh
			} else {
				existing
			};
			current = next as usize;
		}

		let target = &mut self.nodes[current];
		if target.leaf || target.has_children() {
			return Err(AssetError::HuffmanOversubscribed { length });
		}
		target.leaf = true;
		target.symbol = symbol;
		Ok(())
	}

	fn alloc(&mut self) -> Result<u32> {
		if self.nodes.len() >= self.max_nodes {
			return Err(AssetError::HuffmanCapacity { max: self.max_nodes });
		}
		self.nodes.push(Node::default());
		Ok((self.nodes.len() - 1) as u32)
	}
}

/// Count how many symbols use each code length (`counts[0]` is always 0).
pub fn length_counts(lengths: &[u8]) -> Result<[u16; MAX_CODE_LENGTH + 1]> {
	let mut counts = [0_u16; MAX_CODE_LENGTH + 1];
	for &length in lengths {
		if usize::from(length) > MAX_CODE_LENGTH {
			return Err(AssetError::HuffmanCodeTooLong { length });
		}
		if length > 0 {
			counts[usize::from(length)] += 1;
		}
	}
	Ok(counts)
}

/// First canonical code of every length (RFC 1951 section 3.2.2, step 2).
fn next_codes(counts: &[u16; MAX_CODE_LENGTH + 1]) -> Result<[u32; MAX_CODE_LENGTH + 1]> {
	let mut next = [0_u32; MAX_CODE_LENGTH + 1];
	let mut code = 0_u32;
	for length in 1..=MAX_CODE_LENGTH {
		code = (code + u32::from(counts[length - 1])) << 1;
		next[length] = code;
		if code + u32::from(counts[length]) > 1 << length {
			return Err(AssetError::HuffmanOversubscribed { length: length as u8 });
		}
	}
	Ok(next)
}
