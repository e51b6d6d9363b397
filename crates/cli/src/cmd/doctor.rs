use roam2md_core::config::{ConfigLoader, ConfigOverrides, default_config_path};
use std::path::Path;

use crate::logging;

pub fn run(config: Option<&Path>, overrides: &ConfigOverrides) {
    match ConfigLoader::load(config, overrides) {
        Ok(rc) => {
            logging::init(&rc);
            tracing::debug!("configuration resolved");

            println!("OK   roam2md doctor");
            println!("version: {}", roam2md_core::version());
            println!(
                "config: {}",
                rc.config_path.as_ref().map_or_else(
                    || "(built-in defaults)".to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("database: {}", rc.database.display());
            println!("input_dir: {}", rc.input_dir.display());
            println!("output_dir: {}", rc.output_dir.display());
            println!("roam_root: {}", rc.roam_root.display());
            println!("converter: {}", rc.converter.program);
            println!(
                "format: {} -> {} (wrap={}, standalone={})",
                rc.converter.from,
                rc.converter.to,
                rc.converter.wrap.as_str(),
                rc.converter.standalone
            );
            println!(
                "extensions: .{} -> .{}",
                rc.converter.source_extension, rc.converter.target_extension
            );
            println!("database exists: {}", rc.database.is_file());
            println!("input_dir exists: {}", rc.input_dir.is_dir());
            logging::flush();
        }
        Err(e) => {
            println!("FAIL roam2md doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
