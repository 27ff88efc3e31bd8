//! Picture display through an external viewer process.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

use drillbook_core::session::PictureViewer;

/// Launches the configured viewer with the picture path appended, and kills
/// it when the next question comes up.
#[derive(Debug)]
pub struct ExternalViewer {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl ExternalViewer {
    /// `command` is split on whitespace; the first word is the program.
    pub fn new(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| anyhow::anyhow!("image_viewer is set but empty"))?;
        Ok(Self {
            program,
            args: words.collect(),
            child: None,
        })
    }
}

impl PictureViewer for ExternalViewer {
    fn show(&mut self, path: &Path) -> Result<()> {
        self.close();
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch image viewer '{}'", self.program))?;
        tracing::debug!(pid = child.id(), "opened {}", path.display());
        self.child = Some(child);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            // The viewer may already have exited on its own.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for ExternalViewer {
    fn drop(&mut self) {
        self.close();
    }
}
