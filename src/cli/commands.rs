//! Command implementations

use crate::cli::{ConfigArgs, OutputFormat};
use crate::config::{default_config_path, Config};
use crate::export::write_alfred_list;
use crate::sync::{SyncEngine, SyncReport};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Resolve the config file location from the CLI override or the default.
pub fn resolve_config_path(cli_config: Option<&str>) -> PathBuf {
    cli_config
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Resolve the snippet root from the CLI override or the configuration.
pub fn resolve_root(cli_path: Option<&str>, config: &Config) -> PathBuf {
    PathBuf::from(cli_path.unwrap_or(&config.snippet_path))
}

/// Run one synchronization pass and print a summary.
///
/// When export is enabled and the pass changed anything, the Alfred list is
/// written as well. Export failures are reported without failing the sync.
pub fn sync(root: &Path, config: &Config, format: OutputFormat) -> Result<()> {
    let mut engine = SyncEngine::new();
    let report = engine.sync(root)?;

    match format {
        OutputFormat::Json => print_report_json(&report, engine.len())?,
        OutputFormat::Text => print_report_text(&report, engine.len()),
    }

    if config.export_enabled && report.any_changed {
        let export_path = config.effective_export_path();
        if let Err(e) = write_alfred_list(engine.table(), &export_path) {
            eprintln!("Warning: export failed: {}", e);
        } else {
            println!("  Exported: {:?}", export_path);
        }
    }

    Ok(())
}

/// Print every snippet key, in table order.
pub fn list(root: &Path) -> Result<()> {
    let mut engine = SyncEngine::new();
    engine.sync(root)?;

    for key in engine.keys() {
        println!("{}", key);
    }

    Ok(())
}

/// Print one snippet value.
pub fn get(root: &Path, key: &str) -> Result<()> {
    let mut engine = SyncEngine::new();
    engine.sync(root)?;

    let value = engine
        .get(key)
        .with_context(|| format!("Snippet not found: {}", key))?;
    println!("{}", value);

    Ok(())
}

/// Write the Alfred list unconditionally.
pub fn export(root: &Path, config: &Config) -> Result<()> {
    let mut engine = SyncEngine::new();
    engine.sync(root)?;

    let export_path = config.effective_export_path();
    write_alfred_list(engine.table(), &export_path)?;
    println!("✓ Exported {} snippets to {:?}", engine.len(), export_path);

    Ok(())
}

/// Show or change configuration.
pub fn handle_config(config_path: &Path, args: &ConfigArgs) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    let mut changed = false;

    if args.reset {
        config = Config::default();
        changed = true;
        println!("✓ Configuration reset to defaults");
    }

    if let Some(ref path) = args.set_path {
        let path = path.trim_end_matches('/').to_string();
        config.snippet_path = path;
        changed = true;
        // A changed snippet path invalidates everything extracted from the
        // old one; the engine resets itself on the next sync.
        println!("✓ Snippet path set to: {}", config.snippet_path);
    }

    if let Some(ref toggle) = args.export {
        config.export_enabled = match toggle.as_str() {
            "on" => true,
            "off" => false,
            other => anyhow::bail!("Expected 'on' or 'off', got: {}", other),
        };
        changed = true;
        println!(
            "✓ Alfred export {}",
            if config.export_enabled { "enabled" } else { "disabled" }
        );
    }

    if changed {
        config.save(config_path)?;
    }

    if args.show || !changed {
        println!("SnipSync Configuration");
        println!("======================\n");
        println!("Config file: {:?}", config_path);
        println!("Snippet path: {}", config.snippet_path);
        println!("Export enabled: {}", config.export_enabled);
        println!("Export path: {:?}", config.effective_export_path());
    }

    Ok(())
}

/// JSON shape of the sync summary
#[derive(Serialize)]
struct SyncSummary {
    any_changed: bool,
    extracted: usize,
    skipped: usize,
    snippets: usize,
    warnings: Vec<String>,
    finished_at: String,
}

impl SyncSummary {
    fn new(report: &SyncReport, snippets: usize) -> Self {
        Self {
            any_changed: report.any_changed,
            extracted: report.extracted,
            skipped: report.skipped,
            snippets,
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
            finished_at: report.finished_at.to_rfc3339(),
        }
    }
}

/// Print a sync report in JSON format
pub fn print_report_json(report: &SyncReport, snippets: usize) -> Result<()> {
    let json = serde_json::to_string_pretty(&SyncSummary::new(report, snippets))?;
    println!("{}", json);
    Ok(())
}

/// Print a sync report in text format
pub fn print_report_text(report: &SyncReport, snippets: usize) {
    println!("✓ Sync complete");
    println!("  Re-extracted: {}", report.extracted);
    println!("  Unchanged: {}", report.skipped);
    println!("  Snippets: {}", snippets);

    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
}
