//! Local configuration commands. No network; reads and writes the config
//! file at the path handed in by the caller.

use std::path::Path;

use crate::cli::{ConfigAction, ConfigCommand, ConfigSetArgs, GlobalArgs};
use crate::config::{self, FileConfig};
use crate::error::CliError;
use crate::output::{self, OutputFormat, Printer, Table};
use crate::validate;

pub fn run(
    cmd: ConfigCommand,
    global: &GlobalArgs,
    p: &Printer,
    path: &Path,
) -> Result<(), CliError> {
    match cmd.action {
        ConfigAction::Set(args) => set(&args, p, path),
        ConfigAction::Show => show(global.output_format, p, path),
    }
}

fn set(args: &ConfigSetArgs, p: &Printer, path: &Path) -> Result<(), CliError> {
    if args.default_project_id.is_none() && args.base_url.is_none() {
        return Err(CliError::validation(
            "default-project-id",
            "nothing to set; pass --default-project-id and/or --base-url",
        ));
    }
    if let Some(id) = &args.default_project_id {
        validate::uuid("default-project-id", id)?;
    }
    if let Some(url) = &args.base_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::validation("base-url", "must be an http(s) URL"));
        }
    }

    let mut cfg = config::read(path)?;
    if let Some(id) = &args.default_project_id {
        cfg.project_id = Some(id.clone());
    }
    if let Some(url) = &args.base_url {
        cfg.base_url = Some(url.clone());
    }
    config::write(path, &cfg)?;
    p.outputln(&format!("Updated configuration at {}", path.display()));
    Ok(())
}

fn show(format: OutputFormat, p: &Printer, path: &Path) -> Result<(), CliError> {
    let cfg = config::read(path)?;
    if cfg == FileConfig::default() {
        p.outputln(&format!("No configuration stored at {}", path.display()));
        return Ok(());
    }
    match format {
        OutputFormat::Json => {
            let details =
                output::render_json(&cfg).map_err(|e| CliError::render("marshal configuration", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details =
                output::render_yaml(&cfg).map_err(|e| CliError::render("marshal configuration", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.add_row(vec![
                "PROJECT ID".into(),
                cfg.project_id.clone().unwrap_or_default(),
            ]);
            table.add_row(vec![
                "BASE URL".into(),
                cfg.base_url.clone().unwrap_or_default(),
            ]);
            table.display(p);
            Ok(())
        }
    }
}
