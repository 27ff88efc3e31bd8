//! XLSX workbook export, one worksheet per topic.

use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use drillbook_core::model::{Catalog, Topic};

/// Excel rejects sheet names longer than this.
const MAX_SHEET_NAME: usize = 31;

const HEADERS: [&str; 7] = [
    "#",
    "Question",
    "Picture",
    "Answer A",
    "Answer B",
    "Answer C",
    "Answer D",
];

/// Data rows start below the header and one blank row.
pub const FIRST_DATA_ROW: u32 = 3;

/// Sheet name for the topic at `index` (0-based), numbered from 1:
/// `"NN name"`.
pub fn sheet_name(index: usize, topic_name: &str) -> String {
    let raw = format!("{:02} {topic_name}", index + 1);
    raw.chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(MAX_SHEET_NAME)
        .collect()
}

fn fill_sheet(sheet: &mut umya_spreadsheet::Worksheet, topic: &Topic) {
    for (col, header) in HEADERS.iter().enumerate() {
        let cell = sheet.get_cell_mut(((col as u32) + 1, 1));
        cell.set_value(*header);
        cell.get_style_mut().get_font_mut().set_bold(true);
    }

    for (offset, question) in topic.questions.iter().enumerate() {
        let row = FIRST_DATA_ROW + offset as u32;
        sheet
            .get_cell_mut((1, row))
            .set_value_number(question.ordinal_in_topic as f64);
        sheet.get_cell_mut((2, row)).set_value(question.text.as_str());
        if question.has_picture {
            sheet.get_cell_mut((3, row)).set_value("yes");
        }
        for (i, answer) in question.answers.iter().enumerate() {
            sheet
                .get_cell_mut(((i as u32) + 4, row))
                .set_value(answer.as_str());
        }
    }
}

/// Build the workbook bytes for `catalog`.
pub fn generate_table(catalog: &Catalog) -> Result<Vec<u8>> {
    let mut book = umya_spreadsheet::new_file();

    for (index, topic) in catalog.topics.iter().enumerate() {
        let name = sheet_name(index, &topic.name);
        let sheet = if index == 0 {
            let ws = book
                .get_sheet_mut(&0)
                .ok_or_else(|| anyhow!("workbook has no default sheet"))?;
            ws.set_name(name.as_str());
            ws
        } else {
            book.new_sheet(name.as_str())
                .map_err(|e| anyhow!("failed to add sheet '{name}': {e}"))?
        };
        fill_sheet(sheet, topic);
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf)
        .map_err(|e| anyhow!("failed to serialize workbook: {e}"))?;
    Ok(buf.into_inner())
}

/// Write the workbook to `path`, creating parent directories.
pub fn write_table(catalog: &Catalog, path: &Path) -> Result<()> {
    let bytes = generate_table(catalog)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write workbook to {}", path.display()))?;
    tracing::info!(
        "wrote {} sheet(s) to {}",
        catalog.topics.len(),
        path.display()
    );
    Ok(())
}
