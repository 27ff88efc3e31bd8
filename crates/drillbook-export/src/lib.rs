//! drillbook-export — catalog exports.
//!
//! Writes the parsed catalog as an XML questionnaire, as an XLSX workbook
//! with one sheet per topic, or as randomized plain-text practice sheets.

pub mod markup;
pub mod practice;
pub mod table;

pub use markup::write_markup;
pub use practice::write_practice_sheets;
pub use table::write_table;
