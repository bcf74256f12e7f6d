//! Human-readable diagnostic journal, one file per calendar day.
use std::{
    collections::BTreeMap,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use chrono::{Local, NaiveDate, NaiveDateTime};

const DEFAULT_JOURNAL_DIRECTORY: &str = "logs";
const JOURNAL_FILE_PREFIX: &str = "autocontainer";

#[derive(Debug, Clone)]
struct JournalLine {
    written_at: NaiveDateTime,
    message: String,
}

/// Buffers journal lines and appends them to `logs/autocontainer_YYYYMMDD.log`.
#[derive(Resource, Debug)]
pub struct AutoOpenJournal {
    directory: PathBuf,
    pending: Vec<JournalLine>,
}

impl AutoOpenJournal {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.push_at(Local::now().naive_local(), message);
    }

    pub fn push_at(&mut self, written_at: NaiveDateTime, message: impl Into<String>) {
        self.pending.push(JournalLine {
            written_at,
            message: message.into(),
        });
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(format!(
            "{}_{}.log",
            JOURNAL_FILE_PREFIX,
            date.format("%Y%m%d")
        ))
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Appends buffered lines to the file of the day each line was written.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        create_dir_all(&self.directory)?;

        let mut by_day: BTreeMap<NaiveDate, Vec<JournalLine>> = BTreeMap::new();
        for line in std::mem::take(&mut self.pending) {
            by_day.entry(line.written_at.date()).or_default().push(line);
        }

        for (date, lines) in by_day {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.file_for(date))?;
            for line in lines {
                writeln!(
                    file,
                    "[{}] {}",
                    line.written_at.format("%H:%M:%S"),
                    line.message
                )?;
            }
            file.flush()?;
        }
        Ok(())
    }
}

impl Default for AutoOpenJournal {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_DIRECTORY)
    }
}

pub fn flush_auto_open_journal(mut journal: ResMut<AutoOpenJournal>) {
    if let Err(err) = journal.flush() {
        warn!(
            "Failed to write auto-open journal to {:?}: {}",
            journal.directory(),
            err
        );
    }
}
