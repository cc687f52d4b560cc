use crate::domain::{DEFAULT_BLOCK_SIZE, HashAlgorithm, OriginalPolicy, ScanConfig};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum HashAlgorithmChoice {
    #[value(help = "SHA-256 (default)")]
    Sha256,
    #[value(help = "BLAKE3, faster on most hardware")]
    Blake3,
}

impl From<HashAlgorithmChoice> for HashAlgorithm {
    fn from(choice: HashAlgorithmChoice) -> Self {
        match choice {
            HashAlgorithmChoice::Sha256 => HashAlgorithm::Sha256,
            HashAlgorithmChoice::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OriginalChoice {
    #[value(help = "Keep the lexicographically smallest path")]
    Path,
    #[value(help = "Keep the first file in directory walk order")]
    Traversal,
    #[value(help = "Keep the first file whose hash finished (not reproducible)")]
    Completion,
}

impl From<OriginalChoice> for OriginalPolicy {
    fn from(choice: OriginalChoice) -> Self {
        match choice {
            OriginalChoice::Path => OriginalPolicy::Path,
            OriginalChoice::Traversal => OriginalPolicy::Traversal,
            OriginalChoice::Completion => OriginalPolicy::Completion,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "dupsweep")]
#[command(about = "Find files with identical content and delete redundant copies")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Directory to scan", default_value = ".")]
    pub root: PathBuf,

    #[arg(short = 'j', long = "threads", help = "Number of hashing workers (default: CPU count)")]
    pub threads: Option<usize>,

    #[arg(
        long = "block-size",
        help = "Read block size in bytes",
        default_value_t = DEFAULT_BLOCK_SIZE,
        value_parser = parse_block_size
    )]
    pub block_size: usize,

    #[arg(
        short = 'a',
        long = "algorithm",
        help = "Hash algorithm to use",
        value_enum,
        default_value = "sha256"
    )]
    pub hash_algorithm: HashAlgorithmChoice,

    #[arg(short = 'L', long = "follow-symlinks", help = "Follow symbolic links")]
    pub follow_symlinks: bool,

    #[arg(
        long = "original",
        help = "Which file of each group is kept",
        value_enum,
        default_value = "path"
    )]
    pub original: OriginalChoice,

    #[arg(short = 'f', long = "format", help = "Output format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    #[arg(short = 'o', long = "output", help = "Output file path (stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    #[arg(long = "summary-only", help = "Show only summary statistics, not the groups")]
    pub summary_only: bool,

    #[arg(short = 'i', long = "interactive", help = "Choose duplicates to delete interactively")]
    pub interactive: bool,

    #[arg(
        long = "select-all",
        help = "Delete every duplicate except each group's original",
        conflicts_with = "interactive"
    )]
    pub select_all: bool,

    #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation before deleting")]
    pub yes: bool,

    #[arg(long = "dry-run", help = "Report what would be deleted without deleting")]
    pub dry_run: bool,

    #[arg(long = "no-bell", help = "Do not ring the terminal bell when the scan finishes")]
    pub no_bell: bool,

    #[arg(short = 'q', long = "quiet", help = "Suppress progress output and non-error logs")]
    pub quiet: bool,

    #[arg(short = 'v', long = "verbose", help = "Increase log verbosity (-v, -vv)", action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_block_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("block size must be at least 1 byte".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    pub fn to_scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::new(&self.root)
            .with_block_size(self.block_size)
            .with_hash_algorithm(self.hash_algorithm.clone().into())
            .with_follow_symlinks(self.follow_symlinks)
            .with_original_policy(self.original.clone().into());

        if let Some(threads) = self.threads {
            config = config.with_worker_count(threads);
        }

        config
    }

    pub fn wants_deletion(&self) -> bool {
        self.interactive || self.select_all
    }
}
