use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::store::{self, SettingsStore, StoreError};
use crate::util::{format_duration, mean};

pub const GAME_HISTORY_KEY: &str = "gameHistory";
const CSV_HEADER: [&str; 5] = ["id", "date", "score", "time", "ranges"];

/// One completed game. Written once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistoryEntry {
    /// Creation time in epoch milliseconds
    pub id: i64,
    pub date: String,
    pub score: u32,
    /// Game duration in whole seconds
    pub time: u64,
    pub ranges: String,
}

impl GameHistoryEntry {
    pub fn new(score: u32, time: u64, ranges: String, at: DateTime<Local>) -> Self {
        Self {
            id: at.timestamp_millis(),
            date: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            score,
            time,
            ranges,
        }
    }

    pub fn time_label(&self) -> String {
        format_duration(self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySummary {
    pub games: usize,
    pub best_score: Option<u32>,
    pub mean_time_secs: Option<f64>,
}

/// Completed games, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameHistory {
    entries: Vec<GameHistoryEntry>,
}

impl GameHistory {
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        Self {
            entries: store::load(store, GAME_HISTORY_KEY, Vec::new()),
        }
    }

    pub fn save<S: SettingsStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        store::save(store, GAME_HISTORY_KEY, &self.entries)
    }

    pub fn record(&mut self, entry: GameHistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[GameHistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&GameHistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        let times: Vec<f64> = self.entries.iter().map(|e| e.time as f64).collect();
        HistorySummary {
            games: self.entries.len(),
            best_score: self.entries.iter().map(|e| e.score).max(),
            mean_time_secs: mean(&times),
        }
    }

    /// Write all entries as CSV with a header row, newest first.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn export_csv_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        let file = File::create(path)?;
        self.export_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySettingsStore;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn entry(score: u32, time: u64, secs: i64) -> GameHistoryEntry {
        GameHistoryEntry::new(score, time, "1-10 × 1-10".to_string(), at(secs))
    }

    #[test]
    fn record_prepends() {
        let mut history = GameHistory::default();
        history.record(entry(100, 60, 0));
        history.record(entry(120, 90, 10));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().score, 120);
        assert_eq!(history.entries()[1].score, 100);
    }

    #[test]
    fn entry_id_is_creation_millis() {
        let e = entry(10, 5, 0);
        assert_eq!(e.id, 1_700_000_000_000);
        assert_eq!(e.time_label(), "0m 5s");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let store = MemorySettingsStore::new();
        let mut history = GameHistory::default();
        history.record(entry(100, 61, 0));
        history.save(&store).unwrap();

        let loaded = GameHistory::load(&store);
        assert_eq!(loaded, history);

        let raw = store.load_raw(GAME_HISTORY_KEY).unwrap();
        assert!(raw.starts_with("[{\"id\":"));
        assert!(raw.contains("\"ranges\":\"1-10 × 1-10\""));
    }

    #[test]
    fn corrupt_history_loads_empty() {
        let store = MemorySettingsStore::new();
        store.insert_raw(GAME_HISTORY_KEY, "[{\"id\": true}]");
        assert!(GameHistory::load(&store).is_empty());
    }

    #[test]
    fn summary_over_entries() {
        let mut history = GameHistory::default();
        assert_eq!(
            history.summary(),
            HistorySummary {
                games: 0,
                best_score: None,
                mean_time_secs: None
            }
        );

        history.record(entry(100, 30, 0));
        history.record(entry(110, 90, 1));
        let summary = history.summary();
        assert_eq!(summary.games, 2);
        assert_eq!(summary.best_score, Some(110));
        assert_eq!(summary.mean_time_secs, Some(60.0));
    }

    #[test]
    fn csv_export_of_empty_history_is_header_only() {
        let mut out = Vec::new();
        GameHistory::default().export_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,date,score,time,ranges\n");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let mut history = GameHistory::default();
        history.record(entry(100, 30, 0));
        history.record(entry(11, 4, 1));

        let mut out = Vec::new();
        history.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "id,date,score,time,ranges");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",11,4,"));
        assert!(lines[2].ends_with(",100,30,1-10 × 1-10"));
    }

    #[test]
    fn csv_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut history = GameHistory::default();
        history.record(entry(50, 12, 0));

        history.export_csv_to_path(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,date,score,time,ranges"));
    }
}
