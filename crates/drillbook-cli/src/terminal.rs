//! Terminal implementation of the quiz I/O.
//!
//! Stdin is read on a feeder thread and Ctrl-C is caught by a signal
//! handler; both send [`InputEvent`]s over one channel, so the quiz itself
//! stays on the main thread and sees an interrupt like any other input.

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

use drillbook_core::model::{display_answer, Question};
use drillbook_core::session::{Feedback, InputEvent, Presentation, QuizIo};

pub struct TerminalIo<W: Write> {
    events: Receiver<InputEvent>,
    out: W,
}

impl TerminalIo<io::Stdout> {
    /// Start the stdin feeder and install the Ctrl-C handler.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = unbounded();

        let interrupt_tx = tx.clone();
        ctrlc::set_handler(move || {
            let _ = interrupt_tx.send(InputEvent::Interrupted);
        })
        .context("failed to install Ctrl-C handler")?;

        thread::spawn(move || feed_lines(io::stdin().lock(), &tx));

        Ok(Self::from_channel(rx, io::stdout()))
    }
}

/// Forward each line of `reader` as an input event, then `Closed`.
///
/// Bytes that are not UTF-8 are replaced, so garbled input reaches the quiz
/// as an invalid command instead of ending it.
fn feed_lines<R: BufRead>(mut reader: R, tx: &Sender<InputEvent>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if tx.send(InputEvent::Line(line)).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("failed to read input: {e}");
                break;
            }
        }
    }
    let _ = tx.send(InputEvent::Closed);
}

impl<W: Write> TerminalIo<W> {
    pub fn from_channel(events: Receiver<InputEvent>, out: W) -> Self {
        Self { events, out }
    }
}

impl<W: Write> QuizIo for TerminalIo<W> {
    fn present(&mut self, question: &Question, presentation: &Presentation) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", question.text)?;
        for (position, answer) in presentation.answers(question).enumerate() {
            writeln!(self.out, "{}. {}", position + 1, display_answer(answer))?;
        }
        writeln!(
            self.out,
            "Answer: 1-{}, quit: q, show id: i",
            presentation.order.len()
        )?;
        self.out.flush()
    }

    fn feedback(&mut self, feedback: Feedback) -> io::Result<()> {
        match feedback {
            Feedback::WrongAnswer { correct_position } => writeln!(
                self.out,
                "Wrong. The correct answer is {}.",
                correct_position + 1
            )?,
            Feedback::Identifier(identifier) => {
                writeln!(self.out, "Question id: {identifier}")?
            }
            Feedback::InvalidInput => writeln!(self.out, "Enter an answer number, q or i.")?,
        }
        self.out.flush()
    }

    fn next_input(&mut self) -> io::Result<InputEvent> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        // All senders gone means input is over.
        Ok(self.events.recv().unwrap_or(InputEvent::Closed))
    }
}
