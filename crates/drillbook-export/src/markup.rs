//! XML questionnaire export.
//!
//! One `<topic>` element per topic, holding one `<question>` per question
//! with the prompt, the correct answer and the three distractors.

use std::path::Path;

use anyhow::{Context, Result};

use drillbook_core::model::Catalog;

/// First numeric element id; ids increment across topics and questions.
pub const FIRST_ELEMENT_ID: u32 = 3000;

const NAMESPACE: &str = "http://sportboot.mobi/";

/// Escape a string for XML text and single- or double-quoted attributes.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Render the questionnaire document for `catalog`.
pub fn generate_markup(catalog: &Catalog) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version='1.0' standalone='yes'?>\n");
    xml.push_str(&format!("<questionaire xmlns='{NAMESPACE}'>\n"));

    let mut element_id = FIRST_ELEMENT_ID;
    let mut reference = 1u32;

    for topic in &catalog.topics {
        xml.push_str(&format!(
            "<topic id='{}' name='{}'>\n",
            element_id,
            xml_escape(&topic.name)
        ));
        element_id += 1;

        for question in &topic.questions {
            xml.push_str(&format!(
                "  <question id='{element_id}' reference='{reference}'>\n"
            ));
            xml.push_str(&format!("    <text>{}</text>\n", xml_escape(&question.text)));
            for (i, answer) in question.answers.iter().enumerate() {
                let tag = if i == 0 { "correct" } else { "incorrect" };
                xml.push_str(&format!("    <{tag}>{}</{tag}>\n", xml_escape(answer)));
            }
            xml.push_str("  </question>\n");
            element_id += 1;
            reference += 1;
        }

        xml.push_str("</topic>\n");
    }

    xml.push_str("</questionaire>\n");
    xml
}

/// Write the questionnaire to `path`, creating parent directories.
pub fn write_markup(catalog: &Catalog, path: &Path) -> Result<()> {
    let xml = generate_markup(catalog);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)
        .with_context(|| format!("failed to write questionnaire to {}", path.display()))?;
    tracing::info!("wrote questionnaire to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillbook_core::parser::parse_catalog;

    const CATALOG: &str = "# 1 Basis & Recht
1 (1) Was gilt bei <Nebel>?
□ A Schallsignale geben
□ B Schneller fahren
□ C Nichts
□ D Ankern
# 2 Navigation
7 (1) Wo ist 'Norden'?
□ A Oben
□ B Unten
□ C Links
□ D Rechts
";

    #[test]
    fn correct_answer_is_first_answer() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let xml = generate_markup(&catalog);
        assert!(xml.contains("<correct>Schallsignale geben</correct>"));
        assert!(xml.contains("<correct>Oben</correct>"));
        assert_eq!(xml.matches("<correct>").count(), 2);
        assert_eq!(xml.matches("<incorrect>").count(), 6);
    }

    #[test]
    fn ids_increment_across_topics() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let xml = generate_markup(&catalog);
        assert!(xml.contains("<topic id='3000' name='Basis &amp; Recht'>"));
        assert!(xml.contains("<question id='3001' reference='1'>"));
        assert!(xml.contains("<topic id='3002' name='Navigation'>"));
        assert!(xml.contains("<question id='3003' reference='2'>"));
    }

    #[test]
    fn values_are_escaped() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let xml = generate_markup(&catalog);
        assert!(xml.contains("<text>Was gilt bei &lt;Nebel&gt;?</text>"));
        assert!(xml.contains("<text>Wo ist &apos;Norden&apos;?</text>"));
        assert!(!xml.contains("<Nebel>"));
    }

    #[test]
    fn document_frame() {
        let xml = generate_markup(&Catalog::default());
        assert!(xml.starts_with("<?xml version='1.0' standalone='yes'?>\n"));
        assert!(xml.contains("<questionaire xmlns='http://sportboot.mobi/'>"));
        assert!(xml.ends_with("</questionaire>\n"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/questionnaire.xml");
        let catalog = parse_catalog(CATALOG).unwrap();
        write_markup(&catalog, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Navigation"));
    }
}
