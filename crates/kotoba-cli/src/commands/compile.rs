//! Compile command: write translations back into the binaries.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use anyhow::{bail, Result};
use kotoba_core::CompileMode;

/// Run the compile command
pub fn run(
    original_dir: &Path,
    translated_dir: &Path,
    output_dir: &Path,
    expand: bool,
) -> Result<()> {
    let mode = if expand {
        CompileMode::Expand
    } else {
        CompileMode::Strict
    };

    let cancel = AtomicBool::new(false);
    let summary = kotoba_core::compile_dir(original_dir, translated_dir, output_dir, mode, &cancel)?;

    eprintln!(
        "Compiled {} files: {} strings replaced, {} left untranslated",
        summary.compiled, summary.replaced, summary.untranslated
    );
    if summary.issues > 0 {
        eprintln!("{} per-entry issue(s) reported; see warnings above", summary.issues);
    }

    if !summary.failures.is_empty() {
        for (file, message) in &summary.failures {
            eprintln!("  {file}: {message}");
        }
        bail!("{} file(s) failed", summary.failures.len());
    }
    eprintln!("Remember to back up the original game files before installing the output");
    Ok(())
}
