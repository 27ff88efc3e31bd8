//! Console rendering of catalog and progress summaries.

use comfy_table::{Cell, Table};

use drillbook_core::model::{Catalog, TopicSummary};
use drillbook_core::statistics::LevelHistogram;

fn percent(share: f64) -> String {
    format!("{:.0} %", share * 100.0)
}

/// Level distribution table with one bar per level.
pub fn histogram_table(hist: &LevelHistogram, width: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Level", "Count", "Distribution", "Share"]);
    for row in &hist.rows {
        table.add_row(vec![
            Cell::new(row.level),
            Cell::new(format!("{} / {}", row.count, hist.total)),
            Cell::new(format!("|{}|", hist.bar(row, width))),
            Cell::new(percent(row.share)),
        ]);
    }
    table
}

pub fn print_histogram(hist: &LevelHistogram, width: usize) {
    println!("{}", histogram_table(hist, width));
    println!(
        "Not yet learned (level <= 0): {}   Learned (level > 0): {}",
        percent(hist.unlearned_share()),
        percent(hist.learned_share())
    );
    println!("A question's level is its correct answers minus its wrong answers.");
}

pub fn topic_table(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Topic", "Questions", "With picture"]);
    for (i, topic) in catalog.topics.iter().enumerate() {
        let summary = TopicSummary::from(topic);
        table.add_row(vec![
            Cell::new(format!("{:02}", i + 1)),
            Cell::new(summary.name),
            Cell::new(summary.question_count),
            Cell::new(summary.with_picture),
        ]);
    }
    table
}
