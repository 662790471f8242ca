mod cli;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use capl_outline::config::ConfigFile;
use capl_outline::exclusion::ExclusionFilter;
use capl_outline::glob::NamePatterns;
use capl_outline::models::{DocumentOutline, MetaInfo, OutputEnvelope};
use capl_outline::outline::{OutlineModel, SortOrder};
use capl_outline::output;
use capl_outline::{logging, scanner, workspace};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let action = match cli::parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    match action {
        cli::CliAction::Help => {
            cli::print_help();
            0
        }
        cli::CliAction::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            0
        }
        cli::CliAction::Run(args) => {
            logging::init(args.verbose);
            execute(args)
        }
    }
}

fn execute(args: cli::CliArgs) -> i32 {
    let root = Path::new(&args.root);
    if !root.is_dir() {
        let envelope = OutputEnvelope {
            error: Some(format!("Directory not found: {}", args.root)),
            ..Default::default()
        };
        output::write_output(&envelope, args.format);
        return 1;
    }

    let model = build_model(args.sort);

    let cancelled = Arc::new(AtomicBool::new(false));
    ctrlc_handler(cancelled.clone());

    if let Some(secs) = args.timeout {
        let cancelled = cancelled.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_secs(secs));
            cancelled.store(true, Ordering::Relaxed);
        });
    }

    let start = Instant::now();

    // Explicit documents are always reported, even without declarations.
    let keep_empty = !args.files.is_empty();
    let files: Vec<PathBuf> = if keep_empty {
        args.files.iter().map(|f| root.join(f)).collect()
    } else {
        let patterns = NamePatterns::or_default(&args.globs);
        let filter = ExclusionFilter::new(&args.excludes, args.no_defaults);
        scanner::find_files(root, &patterns, &filter, &cancelled)
    };
    tracing::debug!("{} candidate files under {}", files.len(), root.display());

    if cancelled.load(Ordering::Relaxed) {
        return finish(&args, &model, files.len(), Vec::new(), start, true);
    }

    let documents = workspace::outline_files(&files, root, &args.groups, &model, keep_empty, &cancelled);
    let timed_out = cancelled.load(Ordering::Relaxed);
    finish(&args, &model, files.len(), documents, start, timed_out)
}

/// Sort order from the saved preference, overridden (and re-saved) by
/// `--sort`.
fn build_model(sort: Option<SortOrder>) -> OutlineModel {
    let mut config = match ConfigFile::open_default() {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("{}, preference will not be saved", e);
            None
        }
    };

    let saved = config.as_ref().map(|c| c.config.sort_order).unwrap_or_default();
    let mut model = OutlineModel::new(saved);

    match (sort, config.as_mut()) {
        (Some(order), Some(config)) => {
            let result = match order {
                SortOrder::Position => model.sort_by_position(config),
                SortOrder::Alphabetical => model.sort_by_alphabetical(config),
            };
            if let Err(e) = result {
                tracing::warn!("{}", e);
            }
        }
        (Some(order), None) => {
            model.apply_preference(order);
        }
        (None, _) => {}
    }
    model
}

fn finish(
    args: &cli::CliArgs,
    model: &OutlineModel,
    files_scanned: usize,
    documents: Vec<DocumentOutline>,
    start: Instant,
    timed_out: bool,
) -> i32 {
    let elapsed = start.elapsed().as_millis();
    let declarations: usize = documents.iter().map(|d| d.declaration_count()).sum();

    let envelope = OutputEnvelope {
        meta: Some(MetaInfo {
            elapsed_ms: elapsed,
            timeout: timed_out,
            files_scanned,
            files_outlined: documents.len(),
            declarations,
            sort_order: model.sort_order(),
        }),
        documents: Some(documents),
        error: if timed_out { Some("Operation timed out or was cancelled; results may be incomplete".into()) } else { None },
    };

    output::write_output(&envelope, args.format);
    if timed_out { 2 } else { 0 }
}

#[cfg(unix)]
fn ctrlc_handler(cancelled: Arc<AtomicBool>) {
    if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGINT, cancelled) {
        tracing::debug!("could not install Ctrl-C handler: {}", e);
    }
}

#[cfg(not(unix))]
fn ctrlc_handler(_cancelled: Arc<AtomicBool>) {}
