//! The `drillbook init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("drillbook.toml").exists() {
        println!("drillbook.toml already exists, skipping.");
    } else {
        std::fs::write("drillbook.toml", SAMPLE_CONFIG)?;
        println!("Created drillbook.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point `catalog` in drillbook.toml at your question catalog");
    println!("  2. Run: drillbook validate");
    println!("  3. Run: drillbook run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# drillbook configuration

catalog = "data/catalog.txt"
save_file = "quiz_save.cfg"
assets_dir = "assets"
# image_viewer = "feh --scale-down"

run_quiz = true
filter_regional_topics = true
excluded_topics = ["Besonderheiten See"]
statistic_width = 50

export_markup = false
markup_path = "export/questionnaire.xml"
export_table = false
table_path = "export/questions.xlsx"
export_randomized = false
randomized_dir = "export"
randomized_sheets = 5
"#;
