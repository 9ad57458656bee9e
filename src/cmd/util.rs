use std::io::Write;

use assetdoc::asset::Result;

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let mut stdout = std::io::stdout().lock();
	serde_json::to_writer_pretty(&mut stdout, payload).map_err(std::io::Error::from)?;
	writeln!(stdout)?;
	Ok(())
}
