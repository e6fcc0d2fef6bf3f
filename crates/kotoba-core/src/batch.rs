//! Directory-level drivers
//!
//! Files are mutually independent, so the per-file pipeline fans out
//! across the rayon pool; within a file everything stays sequential.
//! Output files are written through a temp file and renamed into place,
//! so a crashed or cancelled run never leaves a partial record on disk.
//! Per-file failures are collected, not fatal; the batch always runs to
//! the end unless cancelled.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::compile::{compile_script, CompileMode};
use crate::error::{Error, Result};
use crate::pipeline::extract_record;
use crate::script::FileRecord;

/// Outcome of an extraction batch.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Files that produced a record
    pub extracted: usize,
    /// Files skipped because nothing was found in them
    pub empty: usize,
    pub entries: usize,
    pub translatable: usize,
    /// `(file, message)` per failed file
    pub failures: Vec<(String, String)>,
}

/// Outcome of a compile batch.
#[derive(Debug, Default)]
pub struct CompileSummary {
    pub compiled: usize,
    pub replaced: usize,
    pub untranslated: usize,
    /// Per-entry diagnostics across all files
    pub issues: usize,
    pub failures: Vec<(String, String)>,
}

/// Extract every script in `input_dir`, writing `<name>.json` records
/// into `output_dir`. The cancel flag is checked between files.
pub fn extract_dir(input_dir: &Path, output_dir: &Path, cancel: &AtomicBool) -> Result<ExtractSummary> {
    let files = list_script_files(input_dir)?;
    info!("found {} script files in {}", files.len(), input_dir.display());
    fs::create_dir_all(output_dir)?;

    let results: Vec<(String, Result<Option<FileRecord>>)> = files
        .par_iter()
        .map(|path| {
            let name = basename(path);
            if cancel.load(Ordering::Relaxed) {
                return (name, Err(Error::Cancelled));
            }
            (name.clone(), extract_one(path, &name, output_dir))
        })
        .collect();

    let mut summary = ExtractSummary::default();
    for (name, result) in results {
        match result {
            Ok(Some(record)) => {
                summary.extracted += 1;
                summary.entries += record.entry_count();
                summary.translatable += record.metadata.translatable;
            }
            Ok(None) => summary.empty += 1,
            Err(e) => {
                warn!("{name}: {e}");
                summary.failures.push((name, e.to_string()));
            }
        }
    }

    info!(
        "extracted {} entries ({} translatable) from {} files, {} failures",
        summary.entries,
        summary.translatable,
        summary.extracted,
        summary.failures.len()
    );
    Ok(summary)
}

fn extract_one(path: &Path, name: &str, output_dir: &Path) -> Result<Option<FileRecord>> {
    let data = fs::read(path)?;
    let record = extract_record(&data, name);

    if record.is_empty() {
        debug!("{name}: no text found, skipping");
        return Ok(None);
    }

    let json = serde_json::to_string_pretty(&record)?;
    write_atomic(&output_dir.join(format!("{name}.json")), json.as_bytes())?;
    Ok(Some(record))
}

/// Recompile every record in `translated_dir` against its original in
/// `original_dir`, writing patched binaries into `output_dir`.
pub fn compile_dir(
    original_dir: &Path,
    translated_dir: &Path,
    output_dir: &Path,
    mode: CompileMode,
    cancel: &AtomicBool,
) -> Result<CompileSummary> {
    let mut records: Vec<PathBuf> = fs::read_dir(translated_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    records.sort();
    info!("found {} translated records", records.len());
    fs::create_dir_all(output_dir)?;

    let results: Vec<(String, Result<(usize, usize, usize)>)> = records
        .par_iter()
        .map(|record_path| {
            let name = record_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if cancel.load(Ordering::Relaxed) {
                return (name, Err(Error::Cancelled));
            }
            let result = compile_one(original_dir, record_path, &name, output_dir, mode);
            (name, result)
        })
        .collect();

    let mut summary = CompileSummary::default();
    for (name, result) in results {
        match result {
            Ok((replaced, untranslated, issues)) => {
                summary.compiled += 1;
                summary.replaced += replaced;
                summary.untranslated += untranslated;
                summary.issues += issues;
            }
            Err(e) => {
                warn!("{name}: {e}");
                summary.failures.push((name, e.to_string()));
            }
        }
    }

    info!(
        "compiled {} files, {} strings replaced, {} failures",
        summary.compiled,
        summary.replaced,
        summary.failures.len()
    );
    Ok(summary)
}

fn compile_one(
    original_dir: &Path,
    record_path: &Path,
    name: &str,
    output_dir: &Path,
    mode: CompileMode,
) -> Result<(usize, usize, usize)> {
    let original_path = original_dir.join(name);
    let original = fs::read(&original_path)?;
    let record: FileRecord = serde_json::from_str(&fs::read_to_string(record_path)?)?;

    let output = compile_script(&original, &record, mode)?;
    for issue in &output.issues {
        warn!("{name}: {issue}");
    }

    write_atomic(&output_dir.join(name), &output.bytes)?;
    Ok((output.replaced, output.untranslated, output.issues.len()))
}

/// Script files carry no extension; anything with a dot in its name is
/// not a script.
fn list_script_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInputDir(dir.display().to_string()));
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && !basename(p).contains('.'))
        .collect();
    files.sort();
    Ok(files)
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write through a temp file in the same directory, then rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
