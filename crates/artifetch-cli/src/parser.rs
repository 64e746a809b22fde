//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

const AFTER_HELP: &str = "\
Manifest formats (one entry per line, '#' starts a comment):
  Legacy:    repo_id|filename|subdir[|checksum]
  Enhanced:  source|identifier|filename|subdir[|checksum]

  huggingface|org/repo|model.safetensors|checkpoints
  r2|bucket/path/file.safetensors|file.safetensors|loras
  civitai|12345|auto|checkpoints

Sources: huggingface (hf), r2 (cloudflare), civitai.
CivitAI filenames may be 'auto'/'latest' (primary file) or a suffix like '.safetensors'.

Environment variables (a .env file is loaded if present):
  HF_TOKEN                  HuggingFace token
  CIVITAI_TOKEN             CivitAI token (CIVITAI_API_KEY also accepted)
  R2_ACCESS_KEY_ID          R2 access key
  R2_SECRET_ACCESS_KEY      R2 secret key
  R2_ACCOUNT_ID             Cloudflare account id
  R2_BUCKET                 Default R2 bucket (optional)
  RUST_LOG                  Log filter, overrides --verbose";

/// Download model artifacts listed in a manifest.
#[derive(Debug, Parser)]
#[command(name = "artifetch")]
#[command(about = "Download model artifacts listed in a manifest")]
#[command(version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the manifest file
    #[arg(long, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Destination root for downloaded models
    #[arg(long = "models-dir", value_name = "PATH")]
    pub models_dir: PathBuf,

    /// Validate the manifest without downloading or writing anything
    #[arg(long = "validate-only")]
    pub validate_only: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
