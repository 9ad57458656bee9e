use std::path::PathBuf;

use assetdoc::asset::{Limits, Result, inflate_raw, inflate_with};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Destination for the decompressed bytes.
	#[arg(long)]
	pub out: PathBuf,
	/// Treat input as raw DEFLATE without a zlib wrapper.
	#[arg(long)]
	pub raw: bool,
}

/// Decompress a stream to a file.
pub fn run(args: Args, limits: &Limits) -> Result<()> {
	let Args { path, out, raw } = args;

	let bytes = std::fs::read(&path)?;
	let inflated = if raw { inflate_raw(&bytes, limits)? } else { inflate_with(&bytes, limits)? };
	std::fs::write(&out, &inflated)?;

	println!("path: {}", path.display());
	println!("compressed_bytes: {}", bytes.len());
	println!("inflated_bytes: {}", inflated.len());
	println!("wrote: {}", out.display());

	Ok(())
}
