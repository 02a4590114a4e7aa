use super::ReminderEvent;
use anyhow::Context;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Collaborateur de diffusion (push, journal, panneau UI, ...).
pub trait ReminderSink {
    fn deliver(&mut self, event: &ReminderEvent) -> anyhow::Result<()>;
}

impl ReminderSink for Vec<ReminderEvent> {
    fn deliver(&mut self, event: &ReminderEvent) -> anyhow::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Diffuse dans les logs `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReminderSink for LogSink {
    fn deliver(&mut self, event: &ReminderEvent) -> anyhow::Result<()> {
        info!(
            recipient = %event.recipient_name,
            shift_date = %event.shift_date,
            milestone = %event.milestone,
            "{}",
            event.message
        );
        Ok(())
    }
}

/// Journal des rappels envoyés : un objet JSON par ligne, en ajout.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReminderSink for JsonLinesSink {
    fn deliver(&mut self, event: &ReminderEvent) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        file.write_all(&line)
            .with_context(|| format!("appending to {}", self.path.display()))?;
        Ok(())
    }
}
