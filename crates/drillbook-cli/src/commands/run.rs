//! The `drillbook run` command.

use anyhow::Result;

use drillbook_core::config::DrillbookConfig;
use drillbook_core::filter::TopicFilter;
use drillbook_core::parser::load_catalog;
use drillbook_core::progress::ProgressStore;
use drillbook_core::session::{LogOnlyViewer, PictureViewer, QuizSession, SessionSummary};
use drillbook_core::statistics::LevelHistogram;
use drillbook_core::TerminationReason;

use super::export::write_enabled;
use super::make_rng;
use crate::render::print_histogram;
use crate::terminal::TerminalIo;
use crate::viewer::ExternalViewer;

pub fn execute(
    config: DrillbookConfig,
    no_quiz: bool,
    no_export: bool,
    seed: Option<u64>,
) -> Result<()> {
    let mut catalog = load_catalog(&config.catalog)?;
    let mut rng = make_rng(seed);

    if !no_export {
        write_enabled(&catalog, &config, &mut rng)?;
    }

    let filter = TopicFilter::from_config(&config);
    if !filter.is_noop() {
        filter.apply(&mut catalog);
    }

    if no_quiz || !config.run_quiz {
        return Ok(());
    }

    let had_progress = config.save_file.exists();
    let store = ProgressStore::new(&config.save_file);
    let mut session = QuizSession::start(catalog.into_questions(), store, &config.assets_dir)?;

    if had_progress {
        println!("Progress loaded.");
        print_histogram(
            &LevelHistogram::from_questions(session.questions()),
            config.statistic_width,
        );
    }

    let mut viewer: Box<dyn PictureViewer> = match config.image_viewer.as_deref() {
        Some(command) => Box::new(ExternalViewer::new(command)?),
        None => Box::new(LogOnlyViewer),
    };
    let mut io = TerminalIo::spawn()?;

    let summary = session.run(&mut io, viewer.as_mut(), &mut rng)?;

    println!();
    print_summary(&summary);
    print_histogram(
        &LevelHistogram::from_questions(session.questions()),
        config.statistic_width,
    );
    println!("Progress saved to {}", config.save_file.display());

    Ok(())
}

fn print_summary(summary: &SessionSummary) {
    match summary.reason {
        TerminationReason::Exhausted => println!("Every question is mastered."),
        TerminationReason::Interrupted => println!("Interrupted."),
        TerminationReason::Quit => {}
    }
    println!(
        "Answered {} question(s), {} right on the first try.",
        summary.asked, summary.first_try_correct
    );
}
