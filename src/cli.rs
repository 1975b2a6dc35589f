use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "kikou",
    version,
    about = "Recover ministry organization hierarchies from the government organization list"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["pdf", "text"]))]
pub struct ExtractArgs {
    /// Source PDF, read through pdftotext.
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Pre-extracted text with pages separated by form feeds.
    #[arg(long)]
    pub text: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub layout: bool,

    #[arg(long)]
    pub max_pages: Option<usize>,

    #[arg(long, default_value = ".cache/kikou")]
    pub cache_root: PathBuf,

    #[arg(long, default_value = "data/result/recipients.db")]
    pub recipients_db: PathBuf,

    /// Canonical names, one per line. Used instead of the recipients store.
    #[arg(long)]
    pub names_file: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub entries_json: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/kikou")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
