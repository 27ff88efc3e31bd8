//! drillbook-core — catalog parsing, adaptive selection and progress storage.
//!
//! This crate holds the data model, the catalog parser, the weighting model
//! that turns answer history into sampling weights, the progress store that
//! keeps histories across catalog changes, and the quiz session controller.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod progress;
pub mod selection;
pub mod session;
pub mod statistics;
pub mod weighting;

pub use config::{load_config, load_config_from, DrillbookConfig};
pub use error::{ParseError, StoreError};
pub use model::{Catalog, Question, Topic};
pub use parser::{load_catalog, parse_catalog};
pub use progress::{ProgressStore, Reconciliation, SavedRecord};
pub use session::{QuizSession, SessionSummary, TerminationReason};
