use crate::domain::{DeletionOutcome, DuplicateGroup, ScanSummary};
use crate::ports::OutputPort;
use anyhow::Result;
use console::style;
use serde::Serialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

struct OutputWriter {
    output_file: Option<PathBuf>,
}

impl OutputWriter {
    fn new() -> Self {
        Self { output_file: None }
    }

    fn with_file(path: &Path) -> Self {
        Self {
            output_file: Some(path.to_path_buf()),
        }
    }

    fn write_content(&self, content: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => std::fs::write(path, content)?,
            None => print!("{}", content),
        }
        Ok(())
    }
}

pub struct ConsoleOutputAdapter {
    summary_only: bool,
}

impl ConsoleOutputAdapter {
    pub fn new() -> Self {
        Self {
            summary_only: false,
        }
    }

    pub fn with_summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }
}

impl Default for ConsoleOutputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for ConsoleOutputAdapter {
    fn write_groups(&self, summary: &ScanSummary, groups: &[DuplicateGroup]) -> Result<()> {
        println!("\n=== Duplicate File Scan Results ===");
        println!("Total files scanned: {}", summary.total_files);
        println!("Files hashed: {}", summary.hashed_files);
        if summary.unreadable_files > 0 {
            println!("Unreadable files skipped: {}", summary.unreadable_files);
        }
        if summary.walk_errors > 0 {
            println!("Directories skipped: {}", summary.walk_errors);
        }
        if summary.cancelled {
            println!("{}", style("Scan was interrupted; results are partial.").yellow());
        }
        println!("Duplicate groups found: {}", summary.duplicate_groups);
        println!("Redundant copies: {}", summary.duplicate_files);

        if groups.is_empty() {
            println!("\nNo duplicate files found.");
            return Ok(());
        }

        if !self.summary_only {
            println!("\n=== Duplicate Groups ===");
            for (i, group) in groups.iter().enumerate() {
                println!("\nGroup {} (hash: {}...)", i + 1, group.fingerprint.short());
                println!("  {} {}", style("keep").green(), group.original.display());
                for candidate in &group.candidates {
                    println!("  {} {}", style("dupe").yellow(), candidate.display());
                }
            }
        }

        Ok(())
    }

    fn write_deletions(&self, outcomes: &[DeletionOutcome]) -> Result<()> {
        if outcomes.is_empty() {
            println!("Nothing deleted.");
            return Ok(());
        }

        for outcome in outcomes {
            match outcome.reason() {
                None => println!("{} {}", style("Deleted:").green(), outcome.path.display()),
                Some(reason) => println!(
                    "{} {}: {}",
                    style("Error deleting").red(),
                    outcome.path.display(),
                    reason
                ),
            }
        }

        let deleted = outcomes.iter().filter(|o| o.is_deleted()).count();
        println!("\n{}", style("DELETION SUMMARY:").bold().green());
        println!("Deleted {} files, {} failed", deleted, outcomes.len() - deleted);
        Ok(())
    }
}

#[derive(Serialize)]
struct GroupsReport<'a> {
    summary: &'a ScanSummary,
    groups: &'a [DuplicateGroup],
}

#[derive(Serialize)]
struct DeletionReport<'a> {
    deletions: &'a [DeletionOutcome],
}

enum JsonTarget {
    /// One document on stdout, printed by `finish`.
    Stdout(RefCell<Option<Value>>),
    /// Groups at the given path, deletions beside it.
    File {
        groups: OutputWriter,
        deletions: OutputWriter,
    },
}

pub struct JsonOutputAdapter {
    target: JsonTarget,
}

impl JsonOutputAdapter {
    /// Groups and deletions are combined into a single document on stdout.
    pub fn with_stdout() -> Self {
        Self {
            target: JsonTarget::Stdout(RefCell::new(None)),
        }
    }

    /// Groups go to `path`; the deletion report goes next to it with a
    /// `.deletions.json` suffix.
    pub fn with_file(path: &Path) -> Self {
        let mut deletions = path.as_os_str().to_owned();
        deletions.push(".deletions.json");
        Self {
            target: JsonTarget::File {
                groups: OutputWriter::with_file(path),
                deletions: OutputWriter::with_file(Path::new(&deletions)),
            },
        }
    }

    fn render_groups(summary: &ScanSummary, groups: &[DuplicateGroup]) -> Result<String> {
        Ok(serde_json::to_string_pretty(&GroupsReport { summary, groups })?)
    }

    fn render_deletions(outcomes: &[DeletionOutcome]) -> Result<String> {
        Ok(serde_json::to_string_pretty(&DeletionReport {
            deletions: outcomes,
        })?)
    }

    fn take_document(&self) -> Option<Value> {
        match &self.target {
            JsonTarget::Stdout(pending) => pending.borrow_mut().take(),
            JsonTarget::File { .. } => None,
        }
    }
}

impl OutputPort for JsonOutputAdapter {
    fn write_groups(&self, summary: &ScanSummary, groups: &[DuplicateGroup]) -> Result<()> {
        match &self.target {
            JsonTarget::Stdout(pending) => {
                *pending.borrow_mut() = Some(serde_json::to_value(GroupsReport { summary, groups })?);
                Ok(())
            }
            JsonTarget::File { groups: writer, .. } => {
                let json = Self::render_groups(summary, groups)?;
                writer.write_content(&format!("{}\n", json))
            }
        }
    }

    fn write_deletions(&self, outcomes: &[DeletionOutcome]) -> Result<()> {
        match &self.target {
            JsonTarget::Stdout(pending) => {
                let deletions = serde_json::to_value(outcomes)?;
                let mut pending = pending.borrow_mut();
                if let Some(document) = pending.get_or_insert_with(|| json!({})).as_object_mut() {
                    document.insert("deletions".to_string(), deletions);
                }
                Ok(())
            }
            JsonTarget::File { deletions, .. } => {
                let json = Self::render_deletions(outcomes)?;
                deletions.write_content(&format!("{}\n", json))
            }
        }
    }

    fn finish(&self) -> Result<()> {
        match self.take_document() {
            Some(document) => OutputWriter::new()
                .write_content(&format!("{}\n", serde_json::to_string_pretty(&document)?)),
            None => Ok(()),
        }
    }
}
