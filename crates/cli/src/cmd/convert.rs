//! Convert command implementation.

use std::path::Path;

use roam2md_core::config::{ConfigLoader, ConfigOverrides};
use roam2md_core::convert::{ConversionPipeline, ConvertOptions, PandocConverter};
use roam2md_core::index::{NoteIndex, NoteLayout, RoamDb};
use serde::Serialize;

use crate::ConvertArgs;
use crate::logging;

#[derive(Debug, Serialize)]
struct FailureOutput<'a> {
    id: &'a str,
    title: &'a str,
    error: String,
}

/// Run the convert command.
pub fn run(config: Option<&Path>, overrides: &ConfigOverrides, args: &ConvertArgs) {
    // Load configuration
    let rc = match ConfigLoader::load(config, overrides) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&rc);
    tracing::debug!("Running with DEBUG output");

    // Open database
    let db = match RoamDb::open(&rc.database) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Error opening org-roam database: {}", e);
            logging::flush();
            std::process::exit(1);
        }
    };

    // Build index
    let layout = NoteLayout::from_config(&rc);
    let (index, index_stats) = match NoteIndex::load(&db, &layout) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Error loading notes: {}", e);
            logging::flush();
            std::process::exit(1);
        }
    };
    drop(db);

    // Convert
    let converter = PandocConverter::new(&rc.converter.program);
    let pipeline = ConversionPipeline::new(
        &index,
        &converter,
        ConvertOptions::from_config(&rc.converter),
        &rc.output_dir,
    );
    let report = pipeline.run();

    if args.json {
        let failures: Vec<_> = report
            .failures
            .iter()
            .map(|f| FailureOutput {
                id: f.id.as_str(),
                title: &f.title,
                error: f.error.to_string(),
            })
            .collect();
        let out = serde_json::json!({
            "notes_loaded": index_stats.loaded,
            "notes_skipped": index_stats.skipped,
            "records_quarantined": index_stats.quarantined,
            "stats": report.stats,
            "failures": failures,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Error serializing summary: {}", e),
        }
    } else {
        let stats = &report.stats;
        println!();
        println!("Conversion complete:");
        println!("  Notes loaded:   {}", index_stats.loaded);
        if index_stats.skipped > 0 {
            println!("  Notes skipped:  {}", index_stats.skipped);
        }
        if index_stats.quarantined > 0 {
            println!("  Bad records:    {}", index_stats.quarantined);
        }
        println!("  Converted:      {}", stats.converted);
        println!("  Failed:         {}", stats.failed);
        println!("  Links resolved: {}", stats.links_resolved);
        println!("  Links missing:  {}", stats.links_missing);
        println!("  Duration:       {}ms", stats.duration_ms);
        println!();
        println!("Output written to: {}", rc.output_dir.display());
    }

    logging::flush();
    if args.strict && !report.is_success() {
        std::process::exit(2);
    }
}
