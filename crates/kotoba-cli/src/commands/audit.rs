//! Audit command: lint extracted records for classification issues.

use std::path::Path;

use anyhow::{bail, Result};
use kotoba_core::audit::format_report;

/// Run the audit command
pub fn run(output_dir: &Path) -> Result<()> {
    let issues = kotoba_core::audit_dir(output_dir)?;
    eprint!("{}", format_report(&issues));

    if !issues.is_empty() {
        bail!("{} issue(s) found", issues.len());
    }
    Ok(())
}
