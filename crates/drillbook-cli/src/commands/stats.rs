//! The `drillbook stats` command.

use anyhow::Result;

use drillbook_core::config::DrillbookConfig;
use drillbook_core::filter::TopicFilter;
use drillbook_core::parser::load_catalog;
use drillbook_core::progress::ProgressStore;
use drillbook_core::statistics::LevelHistogram;

use crate::render::print_histogram;

pub fn execute(config: &DrillbookConfig, json: bool) -> Result<()> {
    let mut catalog = load_catalog(&config.catalog)?;
    TopicFilter::from_config(config).apply(&mut catalog);

    let mut questions = catalog.into_questions();
    let reconciliation = ProgressStore::new(&config.save_file).load(&mut questions)?;
    let hist = LevelHistogram::from_questions(&questions);

    if json {
        println!("{}", serde_json::to_string_pretty(&hist)?);
        return Ok(());
    }

    print_histogram(&hist, config.statistic_width);
    if !reconciliation.orphans.is_empty() {
        println!(
            "{} saved record(s) belong to filtered or removed questions.",
            reconciliation.orphans.len()
        );
    }
    Ok(())
}
