//! The `drillbook validate` command.

use anyhow::Result;

use drillbook_core::config::DrillbookConfig;
use drillbook_core::parser::load_catalog;

use crate::render::topic_table;

pub fn execute(config: &DrillbookConfig) -> Result<()> {
    let catalog = load_catalog(&config.catalog)?;

    println!("{}", topic_table(&catalog));
    println!(
        "Catalog valid: {} questions in {} topics.",
        catalog.question_count(),
        catalog.topics.len()
    );

    Ok(())
}
