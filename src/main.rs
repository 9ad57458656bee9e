#![allow(missing_docs)]

use clap::{Parser, Subcommand};

use assetdoc::asset::{Limits, Result};

mod cmd;

#[derive(Parser)]
#[command(name = "assetdoc", about = "PNG, zlib, JSON and glTF inspection tools")]
struct Cli {
	/// Override the decompressed output ceiling in bytes.
	#[arg(long, global = true)]
	max_output: Option<usize>,
	/// Use the strict resource preset.
	#[arg(long, global = true)]
	strict: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Sniff a file and print format-level facts.
	Info(cmd::info::Args),
	/// Decode an RGBA8 PNG.
	Png(cmd::png::Args),
	/// Decompress a zlib or raw DEFLATE stream.
	Inflate(cmd::inflate::Args),
	/// Parse and pretty-print a JSON document.
	Json(cmd::json::Args),
	/// Summarize a glTF document and its meshes.
	Gltf(cmd::gltf::Args),
}

fn main() {
	pretty_env_logger::init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();

	let mut limits = if cli.strict { Limits::strict() } else { Limits::default() };
	if let Some(max_output) = cli.max_output {
		limits.max_output_bytes = max_output;
	}

	match cli.command {
		Commands::Info(args) => cmd::info::run(args, &limits),
		Commands::Png(args) => cmd::png::run(args, &limits),
		Commands::Inflate(args) => cmd::inflate::run(args, &limits),
		Commands::Json(args) => cmd::json::run(args, &limits),
		Commands::Gltf(args) => cmd::gltf::run(args, &limits),
	}
}
