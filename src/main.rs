use anyhow::Result;
use clap::Parser;
use dupsweep::adapters::{
    ConsoleOutputAdapter, FileSystemAdapter, InteractiveSelectionAdapter, JsonOutputAdapter,
    ProgressBarAdapter, StreamingHasher, TerminalNotifier,
};
use dupsweep::cli::{Cli, OutputFormat};
use dupsweep::domain::{DuplicateGroup, ScanSummary};
use dupsweep::error::{ExitCode, ScanError};
use dupsweep::logging::init_logging;
use dupsweep::ports::{OutputPort, SelectionPort};
use dupsweep::services::{DeletionExecutor, ScanCoordinator, all_candidates, group, summarize};
use dupsweep::signal::{ShutdownHandler, install_handler};
use std::process;

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::GeneralError
        }
    };
    process::exit(code.as_i32());
}

fn run(args: Cli) -> Result<ExitCode> {
    let config = args.to_scan_config();
    let shutdown = install_handler().unwrap_or_else(|e| {
        log::warn!("Ctrl+C handler unavailable: {}", e);
        ShutdownHandler::new()
    });

    let progress = ProgressBarAdapter::new().with_quiet(args.quiet);
    let notifier = TerminalNotifier::new().with_bell(!args.no_bell && !args.quiet);
    let coordinator = ScanCoordinator::new(FileSystemAdapter::new(), StreamingHasher::new(), progress)
        .with_notifier(notifier)
        .with_shutdown_flag(shutdown.get_flag());

    let result = match coordinator.scan(&config) {
        Ok(result) => result,
        Err(e @ ScanError::InvalidRoot { .. }) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::GeneralError);
        }
        Err(e) => return Err(e.into()),
    };

    let groups = group(&result, config.original_policy);
    let summary = summarize(&result, &groups);
    drop(result);

    let output: Box<dyn OutputPort> = match (&args.output_format, &args.output_file) {
        (OutputFormat::Text, _) => Box::new(ConsoleOutputAdapter::new().with_summary_only(args.summary_only)),
        (OutputFormat::Json, Some(path)) => Box::new(JsonOutputAdapter::with_file(path)),
        (OutputFormat::Json, None) => Box::new(JsonOutputAdapter::with_stdout()),
    };
    output.write_groups(&summary, &groups)?;
    let code = delete_selected(&args, &summary, &groups, output.as_ref())?;
    output.finish()?;
    Ok(code)
}

fn delete_selected(
    args: &Cli,
    summary: &ScanSummary,
    groups: &[DuplicateGroup],
    output: &dyn OutputPort,
) -> Result<ExitCode> {
    if summary.cancelled {
        return Ok(ExitCode::Interrupted);
    }
    if groups.is_empty() || !args.wants_deletion() {
        return Ok(ExitCode::Success);
    }

    let selector = InteractiveSelectionAdapter::new().with_assume_yes(args.yes || args.dry_run);
    let selection = if args.interactive {
        selector.select(groups)?
    } else {
        let selection = all_candidates(groups);
        if selector.confirm(selection.len())? {
            selection
        } else {
            Default::default()
        }
    };

    let outcomes = DeletionExecutor::new(FileSystemAdapter::new())
        .with_dry_run(args.dry_run)
        .delete(groups, &selection);
    output.write_deletions(&outcomes)?;

    if outcomes.iter().all(|o| o.is_deleted()) {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::PartialSuccess)
    }
}
