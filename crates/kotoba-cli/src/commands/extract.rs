//! Extract command: batch extraction over a script directory.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use anyhow::{bail, Result};

/// Run the extract command
pub fn run(input_dir: &Path, output_dir: &Path) -> Result<()> {
    let cancel = AtomicBool::new(false);
    let summary = kotoba_core::extract_dir(input_dir, output_dir, &cancel)?;

    eprintln!(
        "Extracted {} entries ({} translatable) from {} files",
        summary.entries, summary.translatable, summary.extracted
    );
    if summary.empty > 0 {
        eprintln!("{} files contained no text", summary.empty);
    }

    if !summary.failures.is_empty() {
        for (file, message) in &summary.failures {
            eprintln!("  {file}: {message}");
        }
        bail!("{} file(s) failed", summary.failures.len());
    }
    Ok(())
}
