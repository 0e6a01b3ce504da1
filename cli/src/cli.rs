use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(about = "Upload files the way the Pagecraft uploader does", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload one or more files to an endpoint
    Upload(UploadArgs),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Upload endpoint URL
    #[arg(long, short = 'a', env = "PAGECRAFT_UPLOAD_ACTION")]
    pub action: String,

    /// Queue files without sending them until confirmed
    #[arg(long, short = 'm')]
    pub manual: bool,

    /// Picture list mode: keep an in-memory preview of every file
    #[arg(long)]
    pub picture: bool,

    /// Skip files larger than this many bytes
    #[arg(long)]
    pub max_size: Option<u64>,

    /// Only upload files with these extensions (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub accept: Vec<String>,

    /// Multipart field name carrying the file
    #[arg(long, default_value = "file", env = "PAGECRAFT_UPLOAD_FIELD_NAME")]
    pub field_name: String,

    /// Seconds to wait for all uploads to finish
    #[arg(long, default_value = "120")]
    pub timeout: u64,

    /// Do not ask for confirmation in manual mode
    #[arg(long, short = 'y')]
    pub yes: bool,
}
