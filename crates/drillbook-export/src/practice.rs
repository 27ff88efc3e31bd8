//! Randomized plain-text practice sheets.
//!
//! Each sheet lists every question in a fresh random order with its answers
//! shuffled and numbered from 1, so the correct answer carries no position.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use drillbook_core::model::{Catalog, Question};

/// File name of the sheet at `index`: `random-<index>.txt`.
pub fn sheet_file_name(index: usize) -> String {
    format!("random-{index}.txt")
}

/// Render one sheet over `questions`, in the order given.
pub fn render_sheet<R: Rng + ?Sized>(questions: &[&Question], rng: &mut R) -> String {
    questions
        .iter()
        .map(|q| {
            let mut answers: Vec<&str> = q.answers.iter().map(String::as_str).collect();
            answers.shuffle(rng);
            let numbered: Vec<String> = answers
                .iter()
                .enumerate()
                .map(|(i, a)| format!("{}) {a}", i + 1))
                .collect();
            format!("{}\n{}", q.text, numbered.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Write `count` shuffled sheets into `dir`, returning their paths.
pub fn write_practice_sheets<R: Rng + ?Sized>(
    catalog: &Catalog,
    dir: &Path,
    count: usize,
    rng: &mut R,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut questions: Vec<&Question> = catalog.questions().collect();
    let mut written = Vec::with_capacity(count);
    for index in 0..count {
        questions.shuffle(rng);
        let path = dir.join(sheet_file_name(index));
        std::fs::write(&path, render_sheet(&questions, rng))
            .with_context(|| format!("failed to write practice sheet {}", path.display()))?;
        written.push(path);
    }
    tracing::info!("wrote {count} practice sheet(s) to {}", dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillbook_core::parser::parse_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CATALOG: &str = "# 1 Basisfragen
1 (1) Was ist Backbord?
□ A Links
□ B Rechts
□ C Vorne
□ D Hinten
2 (2) Was ist Steuerbord?
□ A Rechts
□ B Links
□ C Oben
□ D Unten
";

    #[test]
    fn sheet_holds_every_question_and_answer() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let questions: Vec<&Question> = catalog.questions().collect();
        let mut rng = StdRng::seed_from_u64(7);
        let sheet = render_sheet(&questions, &mut rng);

        let blocks: Vec<&str> = sheet.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        for block in blocks {
            let lines: Vec<&str> = block.lines().collect();
            assert_eq!(lines.len(), 5);
            assert!(lines[1].starts_with("1) "));
            assert!(lines[4].starts_with("4) "));
        }
        for answer in ["Links", "Rechts", "Vorne", "Hinten", "Oben", "Unten"] {
            assert!(sheet.contains(answer));
        }
    }

    #[test]
    fn writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = parse_catalog(CATALOG).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let paths = write_practice_sheets(&catalog, dir.path(), 3, &mut rng).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], dir.path().join("random-2.txt"));
        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(content.contains("Was ist Backbord?"));
        assert!(content.contains("Was ist Steuerbord?"));
    }

    #[test]
    fn zero_sheets_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = parse_catalog(CATALOG).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let paths = write_practice_sheets(&catalog, dir.path(), 0, &mut rng).unwrap();
        assert!(paths.is_empty());
    }
}
