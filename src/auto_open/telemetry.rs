//! Telemetry storage for interaction attempts.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use super::state::Attempt;

const DEFAULT_ATTEMPT_TELEMETRY_LOG_PATH: &str = "logs/auto_open_attempts.jsonl";

const DEFAULT_ATTEMPT_TELEMETRY_CAPACITY: usize = 32;

/// Rolling history of attempts for the HUD.
#[derive(Resource, Debug)]
pub struct AttemptTelemetry {
    capacity: usize,
    records: VecDeque<Attempt>,
    opened_total: u64,
    failed_total: u64,
}

impl AttemptTelemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
            opened_total: 0,
            failed_total: 0,
        }
    }

    pub fn push(&mut self, attempt: Attempt) {
        if attempt.succeeded() {
            self.opened_total += 1;
        } else {
            self.failed_total += 1;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(attempt);
    }

    /// Most recent attempts first.
    pub fn recent(&self) -> impl Iterator<Item = &Attempt> {
        self.records.iter().rev()
    }

    pub fn opened_total(&self) -> u64 {
        self.opened_total
    }

    pub fn failed_total(&self) -> u64 {
        self.failed_total
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for AttemptTelemetry {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPT_TELEMETRY_CAPACITY)
    }
}

/// Writes attempts to disk as JSON lines for offline inspection.
#[derive(Resource, Debug)]
pub struct AttemptTelemetryLog {
    output_path: PathBuf,
    pending: Vec<Attempt>,
}

impl AttemptTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, attempt: &Attempt) {
        self.pending.push(attempt.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for attempt in std::mem::take(&mut self.pending) {
            let serialisable: SerializableAttempt = attempt.into();
            serde_json::to_writer(&mut file, &serialisable)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }
}

impl Default for AttemptTelemetryLog {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPT_TELEMETRY_LOG_PATH)
    }
}

/// Flushes pending attempts to disk, logging a warning if persistence fails.
pub fn flush_attempt_telemetry_log(mut log: ResMut<AttemptTelemetryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            "Failed to persist auto-open telemetry to {:?}: {}",
            log.path(),
            err
        );
    }
}

#[derive(Serialize)]
struct SerializableAttempt {
    occurred_at_seconds: f64,
    object: String,
    name: String,
    distance: f32,
    #[serde(flatten)]
    outcome: SerializableOutcome,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum SerializableOutcome {
    Opened { signature: String },
    Failed { error: String },
}

impl From<Attempt> for SerializableAttempt {
    fn from(value: Attempt) -> Self {
        Self {
            occurred_at_seconds: value.at,
            object: value.object.to_string(),
            name: value.name,
            distance: value.distance,
            outcome: match value.result {
                Ok(signature) => SerializableOutcome::Opened {
                    signature: signature.to_string(),
                },
                Err(error) => SerializableOutcome::Failed {
                    error: error.to_string(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_open::{errors::HostError, host::ObjectKey, invoke::UseSignature};
    use serde_json::Value;
    use std::{env, fs, time::SystemTime};

    fn attempt(at: f64, result: Result<UseSignature, HostError>) -> Attempt {
        Attempt {
            object: ObjectKey::new(0x2a),
            name: "Red Chest".to_string(),
            distance: 120.0,
            at,
            result,
        }
    }

    #[test]
    fn telemetry_drops_old_records_when_full() {
        let mut telemetry = AttemptTelemetry::new(2);
        telemetry.push(attempt(1.0, Ok(UseSignature::Pawn)));
        telemetry.push(attempt(2.0, Err(HostError::MissingEntryPoint)));
        telemetry.push(attempt(3.0, Ok(UseSignature::Pawn)));

        assert_eq!(telemetry.len(), 2);
        assert_eq!(telemetry.opened_total(), 2);
        assert_eq!(telemetry.failed_total(), 1);
        let newest: Vec<f64> = telemetry.recent().map(|attempt| attempt.at).collect();
        assert_eq!(newest, vec![3.0, 2.0]);
    }

    #[test]
    fn telemetry_log_writes_json_lines() {
        let temp_dir = env::temp_dir();
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = temp_dir.join(format!("auto_open_attempts_test_{}.jsonl", unique_suffix));

        let mut log = AttemptTelemetryLog::new(&path);
        log.push(&attempt(12.5, Ok(UseSignature::PawnAndController)));
        log.push(&attempt(13.0, Err(HostError::fault("jammed"))));
        log.flush().expect("telemetry log should flush");

        let raw = fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let opened: Value = serde_json::from_str(lines[0]).expect("json line should parse");
        assert_eq!(opened["outcome"], "opened");
        assert_eq!(opened["signature"], "pawn+controller");
        assert_eq!(opened["object"], "OBJ-0000002a");

        let failed: Value = serde_json::from_str(lines[1]).expect("json line should parse");
        assert_eq!(failed["outcome"], "failed");
        assert_eq!(failed["error"], "host fault: jammed");

        let _ = fs::remove_file(&path);
    }
}
