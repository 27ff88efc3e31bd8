//! The `drillbook export` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::Rng;

use drillbook_core::config::DrillbookConfig;
use drillbook_core::model::Catalog;
use drillbook_core::parser::load_catalog;
use drillbook_export::{write_markup, write_practice_sheets, write_table};

use super::make_rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Markup,
    Table,
    Text,
}

fn parse_formats(format: &str) -> Result<Vec<Format>> {
    if format == "all" {
        return Ok(vec![Format::Markup, Format::Table, Format::Text]);
    }
    format
        .split(',')
        .map(|s| match s.trim() {
            "markup" | "xml" => Ok(Format::Markup),
            "table" | "xlsx" => Ok(Format::Table),
            "text" | "txt" => Ok(Format::Text),
            other => anyhow::bail!("unknown export format: '{other}'"),
        })
        .collect()
}

/// Place `default`'s file name inside `dir`.
fn in_dir(dir: &Path, default: &Path) -> PathBuf {
    match default.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}

pub fn execute(
    config: &DrillbookConfig,
    format: &str,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let formats = parse_formats(format)?;
    let catalog = load_catalog(&config.catalog)?;
    let mut rng = make_rng(seed);

    for fmt in formats {
        match fmt {
            Format::Markup => {
                let path = match &output {
                    Some(dir) => in_dir(dir, &config.markup_path),
                    None => config.markup_path.clone(),
                };
                write_markup(&catalog, &path)?;
                eprintln!("Questionnaire: {}", path.display());
            }
            Format::Table => {
                let path = match &output {
                    Some(dir) => in_dir(dir, &config.table_path),
                    None => config.table_path.clone(),
                };
                write_table(&catalog, &path)?;
                eprintln!("Workbook: {}", path.display());
            }
            Format::Text => {
                let dir = output.as_deref().unwrap_or(&config.randomized_dir);
                let paths =
                    write_practice_sheets(&catalog, dir, config.randomized_sheets, &mut rng)?;
                eprintln!("Practice sheets: {} in {}", paths.len(), dir.display());
            }
        }
    }

    Ok(())
}

/// Write the exports enabled in `config`. Used by `drillbook run` before
/// topic filtering, so every export sees the complete catalog.
pub fn write_enabled<R: Rng + ?Sized>(
    catalog: &Catalog,
    config: &DrillbookConfig,
    rng: &mut R,
) -> Result<()> {
    if config.export_markup {
        write_markup(catalog, &config.markup_path)?;
    }
    if config.export_table {
        write_table(catalog, &config.table_path)?;
    }
    if config.export_randomized {
        write_practice_sheets(
            catalog,
            &config.randomized_dir,
            config.randomized_sheets,
            rng,
        )?;
    }
    Ok(())
}
