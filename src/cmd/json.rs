use std::path::PathBuf;

use assetdoc::asset::{Limits, Result, load_json_with, write_json};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Write the document here instead of stdout.
	#[arg(long)]
	pub out: Option<PathBuf>,
}

/// Parse a JSON document and print it back with sorted keys.
pub fn run(args: Args, limits: &Limits) -> Result<()> {
	let Args { path, out } = args;

	let root = load_json_with(&path, limits)?;
	match out {
		Some(out) => write_json(out, &root),
		None => emit_json(&root),
	}
}
