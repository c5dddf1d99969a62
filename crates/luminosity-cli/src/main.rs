mod commands;
mod logging;
mod progress;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ExtractArgs, SidecarCommands, StatsArgs, SunburstArgs};
use dotenv::dotenv;
use indicatif::HumanBytes;
use luminosity_core::catalog::sidecars::{delete_sidecars, DeleteOptions};
use luminosity_core::preview::extract_previews;
use luminosity_core::{AppConfig, Catalog, StatsEngine};
use progress::CliReporter;
use serde::Serialize;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    dotenv().ok();

    let args = Cli::parse();
    let _guard = logging::init_logger(args.verbose);

    let config = match luminosity_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    match args.command {
        Some(Commands::Stats(stats)) => run_stats(&config, &stats)?,
        Some(Commands::Sidecars(SidecarCommands::Summary { catalogs })) => {
            run_sidecars_summary(&catalogs)
        }
        Some(Commands::Sidecars(SidecarCommands::List { catalogs })) => run_sidecars_list(&catalogs)?,
        Some(Commands::Sidecars(SidecarCommands::Delete {
            delete_missing_originals,
            yes,
            catalogs,
        })) => {
            if !yes
                && !prompt_confirm(
                    "Are you SURE you want to DELETE the sidecar files of these catalogs?",
                    Some(false),
                )?
            {
                process::exit(0);
            }
            run_sidecars_delete(
                &catalogs,
                DeleteOptions {
                    delete_missing_originals,
                },
            )
        }
        Some(Commands::Sunburst(sunburst)) => run_sunburst(&sunburst)?,
        Some(Commands::Extract(extract)) => run_extract(&config, &extract)?,
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, data: &T, pretty_print: bool) -> Result<()> {
    debug!(file = %path.display(), "Writing JSON");
    let json = if pretty_print {
        serde_json::to_vec_pretty(data)?
    } else {
        serde_json::to_vec(data)?
    };
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// `<outfile dir>/<catalog name>.json`
fn per_catalog_path(outfile: &Path, catalog: &Path) -> PathBuf {
    let name = catalog
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    outfile
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{}.json", name))
}

fn run_stats(config: &AppConfig, args: &StatsArgs) -> Result<()> {
    let engine = StatsEngine::new(config.clone());
    let reporter = CliReporter::new();

    let result = engine.run(&args.paths, &reporter, |catalog| {
        if !args.per_catalog {
            return;
        }
        if let Some(path) = catalog.paths().first() {
            let target = per_catalog_path(&args.outfile, path);
            if let Err(e) = write_json(&target, catalog, args.pretty_print) {
                warn!(catalog = %path.display(), error = %e, "Error writing per-catalog stats");
            }
        }
    });

    let mut merged = result.merged;
    write_json(&args.outfile, &merged, args.pretty_print)?;

    let photo_count = merged.stats()?.photo_count();
    println!();
    info!(
        "{} catalogs processed, {} failed, {} photos",
        format!("{}", result.processed).green(),
        format!("{}", result.failed).red(),
        format!("{}", photo_count).cyan(),
    );
    info!(
        "Search: {}, Load: {}, written to {}",
        format!("{:.2}s", result.search_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.load_duration.as_secs_f64()).green(),
        args.outfile.display(),
    );
    Ok(())
}

fn open_or_warn(path: &Path) -> Option<Catalog> {
    match Catalog::open(path) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!(catalog = %path.display(), error = %e, "Error opening catalog, skipping");
            None
        }
    }
}

fn run_sidecars_summary(catalogs: &[PathBuf]) {
    for path in catalogs {
        let Some(catalog) = open_or_warn(path) else {
            continue;
        };
        match catalog.sidecar_stats() {
            Ok(info) => {
                println!("Sidecar Summary for {}", path.display().to_string().bold());
                println!("  Count:             {}", info.count);
                println!("  Total Size:        {}", HumanBytes(info.total_size_bytes));
                println!("  Missing Sidecars:  {}", info.missing_sidecar_count);
                println!("  Missing Originals: {}", info.missing_original_count);
            }
            Err(e) => error!(catalog = %path.display(), error = %e, "Error getting sidecar file stats"),
        }
    }
}

fn run_sidecars_list(catalogs: &[PathBuf]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in catalogs {
        let Some(catalog) = open_or_warn(path) else {
            continue;
        };
        match catalog.sidecars() {
            Ok(records) => {
                for record in records {
                    writeln!(out, "{}", record.sidecar_path.display())?;
                }
            }
            Err(e) => error!(catalog = %path.display(), error = %e, "Error listing sidecars"),
        }
    }
    Ok(())
}

fn run_sidecars_delete(catalogs: &[PathBuf], options: DeleteOptions) {
    for path in catalogs {
        let Some(catalog) = open_or_warn(path) else {
            continue;
        };
        let records = match catalog.sidecars() {
            Ok(records) => records,
            Err(e) => {
                error!(catalog = %path.display(), error = %e, "Error listing sidecars");
                continue;
            }
        };
        let summary = delete_sidecars(&records, options);
        println!("Done with {}.", path.display().to_string().bold());
        println!("   Total:   {}", summary.total);
        println!("   Deleted: {}", summary.deleted.to_string().green());
        println!("   Skipped: {}", summary.skipped.to_string().yellow());
        println!("   Missing: {}", summary.missing);
        println!("   Errors:  {}", summary.errors.to_string().red());
    }
}

fn run_sunburst(args: &SunburstArgs) -> Result<()> {
    let catalog = Catalog::open(&args.catalog)
        .with_context(|| format!("opening catalog {}", args.catalog.display()))?;
    let tree = catalog
        .sunburst()
        .with_context(|| format!("getting sunburst stats for {}", args.catalog.display()))?;
    write_json(&args.outfile, &tree, args.pretty_print)?;
    info!(
        "{} photos written to {}",
        format!("{}", tree.total()).cyan(),
        args.outfile.display()
    );
    Ok(())
}

fn run_extract(config: &AppConfig, args: &ExtractArgs) -> Result<()> {
    let out_dir = args.output_dir.as_deref().unwrap_or(&config.output_dir);
    let reporter = CliReporter::new();
    let summary = extract_previews(&args.catalog, out_dir, &reporter)
        .with_context(|| format!("extracting previews from {}", args.catalog.display()))?;

    println!();
    info!(
        "{} written, {} without preview, {} failed",
        format!("{}", summary.written).green(),
        format!("{}", summary.missing).yellow(),
        format!("{}", summary.failed).red(),
    );
    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
