//! SnipSync - Markdown snippet synchronization tool
//!
//! Keeps a key→value table of snippets in sync with one or more markdown
//! documents and optionally mirrors it to an Alfred JSON list.

use anyhow::Result;
use clap::Parser;
use snipsync::cli::{
    export, get, handle_config, list, print_report_text, resolve_config_path, resolve_root, sync,
    Cli, Commands,
};
use snipsync::config::Config;
use snipsync::export::write_alfred_list;
use snipsync::sync::{SyncEngine, SNIPPET_EXTENSION};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load_or_default(&config_path)?;
    let root = resolve_root(cli.path.as_deref(), &config);

    // Execute command
    match cli.command {
        Commands::Sync => {
            sync(&root, &config, cli.format)?;
        }

        Commands::List => {
            list(&root)?;
        }

        Commands::Get(args) => {
            get(&root, &args.key)?;
        }

        Commands::Export => {
            export(&root, &config)?;
        }

        Commands::Watch(args) => {
            run_watch(&root, &config, args.debounce)?;
        }

        Commands::Config(args) => {
            handle_config(&config_path, &args)?;
        }
    }

    Ok(())
}

/// Run in watch mode
fn run_watch(root: &Path, config: &Config, debounce_ms: u64) -> Result<()> {
    use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc::channel;
    use std::time::Duration;

    println!("Watching for changes in {:?}...", root);
    println!("Press Ctrl+C to stop.\n");

    // One engine for the whole watch session, so each re-sync only touches
    // the documents that actually changed.
    let mut engine = SyncEngine::new();
    let report = engine.sync(root)?;
    print_report_text(&report, engine.len());

    if config.export_enabled && report.any_changed {
        if let Err(e) = write_alfred_list(engine.table(), &config.effective_export_path()) {
            eprintln!("Warning: export failed: {}", e);
        }
    }

    let (tx, rx) = channel();

    let notify_config =
        NotifyConfig::default().with_poll_interval(Duration::from_millis(debounce_ms));

    let mut watcher = RecommendedWatcher::new(tx, notify_config)?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    let mut last_sync = std::time::Instant::now();
    let debounce = Duration::from_millis(debounce_ms);

    loop {
        match rx.recv() {
            Ok(event) => {
                if let Ok(event) = event {
                    // Debounce
                    if last_sync.elapsed() < debounce {
                        continue;
                    }

                    // Check if it's a snippet document
                    let snippet_paths: Vec<_> = event
                        .paths
                        .iter()
                        .filter(|p| {
                            p.extension()
                                .and_then(|e| e.to_str())
                                .is_some_and(|e| e.eq_ignore_ascii_case(SNIPPET_EXTENSION))
                        })
                        .collect();

                    if !snippet_paths.is_empty() {
                        println!("\n📝 Changes detected, syncing...");

                        match engine.sync(root) {
                            Ok(report) => {
                                print_report_text(&report, engine.len());

                                if config.export_enabled && report.any_changed {
                                    if let Err(e) = write_alfred_list(
                                        engine.table(),
                                        &config.effective_export_path(),
                                    ) {
                                        eprintln!("Warning: export failed: {}", e);
                                    }
                                }
                            }
                            Err(e) => {
                                eprintln!("Sync error: {}", e);
                            }
                        }

                        last_sync = std::time::Instant::now();
                    }
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
