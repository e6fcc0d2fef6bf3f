use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kotoba", about = "Extract and recompile scenario script text", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract text from binary script files into JSON records
    Extract {
        /// Directory of binary script files (no extensions)
        input_dir: PathBuf,
        /// Directory for the per-file JSON records
        output_dir: PathBuf,
    },

    /// Check extracted JSON records against the classification invariants
    Audit {
        /// Directory of extracted JSON records
        output_dir: PathBuf,
    },

    /// Write translations back into copies of the original binaries
    Compile {
        /// Directory of the original binary script files
        original_dir: PathBuf,
        /// Directory of translated JSON records
        translated_dir: PathBuf,
        /// Directory for the patched binaries
        output_dir: PathBuf,

        /// Splice in translations longer than their original byte
        /// ranges instead of rejecting the file. Engine-side offset
        /// tables may desynchronize; use with care.
        #[arg(long)]
        expand: bool,
    },
}
