//! The persisted top-six high score table.
//!
//! Reading and writing the backing text is delegated to a [`HiScoreStore`]; every failure
//! there is recoverable. An unreadable store yields the built-in table, and a failed write
//! is logged and otherwise ignored.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use bevy_ecs::resource::Resource;
use thousands::Separable;
use tracing::{debug, info, warn};

use crate::constants::{hiscore, score};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiScoreEntry {
    pub name: String,
    pub score: u32,
}

impl HiScoreEntry {
    /// Builds an entry, truncating the name and capping the score.
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            name: name.chars().take(hiscore::NAME_WIDTH).collect(),
            score: score.min(score::MAX),
        }
    }
}

/// Always exactly [`hiscore::ENTRIES`] entries, highest score first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiScoreTable {
    entries: Vec<HiScoreEntry>,
}

const DEFAULT_TABLE: [(&str, u32); hiscore::ENTRIES] = [
    ("David", 100_000),
    ("Andy", 80_000),
    ("Count Pacula", 60_000),
    ("Cleopacra", 40_000),
    ("Brett Favre", 20_000),
    ("Sergei Pachmanioff", 10_000),
];

impl Default for HiScoreTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TABLE
                .iter()
                .map(|&(name, score)| HiScoreEntry::new(name, score))
                .collect(),
        }
    }
}

impl HiScoreTable {
    /// Parses `"<score> <name>"` lines. Malformed lines are skipped; missing slots are
    /// filled from the built-in table.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<HiScoreEntry> = text
            .lines()
            .filter_map(|line| {
                let (score, name) = line.trim().split_once(char::is_whitespace)?;
                let score: u64 = score.parse().ok()?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some(HiScoreEntry::new(name, score.min(score::MAX as u64) as u32))
            })
            .collect();

        if entries.len() < hiscore::ENTRIES {
            let missing = hiscore::ENTRIES - entries.len();
            entries.extend(Self::default().entries.into_iter().take(missing));
        }

        Self::normalized(entries)
    }

    fn normalized(mut entries: Vec<HiScoreEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(hiscore::ENTRIES);
        Self { entries }
    }

    /// A new table containing this one plus `entry`, re-sorted and cut back to size.
    /// Ties keep existing entries ahead of the newcomer.
    pub fn merged(&self, entry: HiScoreEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self::normalized(entries)
    }

    pub fn entries(&self) -> &[HiScoreEntry] {
        &self.entries
    }

    /// The text written back to the store.
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{} {}\n", entry.score, entry.name))
            .collect()
    }

    /// Display rows: name right-aligned in 22 columns, score right-aligned in 9.
    pub fn display_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:>name$}{:>score$}",
                    entry.name,
                    entry.score,
                    name = hiscore::NAME_WIDTH,
                    score = hiscore::SCORE_WIDTH
                )
            })
            .collect()
    }
}

/// Raw access to wherever high scores are kept.
pub trait HiScoreStore {
    fn load(&mut self) -> io::Result<String>;
    fn save(&mut self, text: &str) -> io::Result<()>;
}

/// Stores the table as `hiscore.txt` inside a preferences directory.
#[derive(Debug, Clone)]
pub struct FileHiScoreStore {
    path: PathBuf,
}

impl FileHiScoreStore {
    pub fn new(pref_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: pref_dir.into().join(hiscore::FILE_NAME),
        }
    }
}

impl HiScoreStore for FileHiScoreStore {
    fn load(&mut self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn save(&mut self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)
    }
}

/// Keeps the table in memory. Clones share the same contents, so a caller can hold on to
/// one clone and inspect what the simulation saved through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryHiScoreStore {
    text: Rc<RefCell<Option<String>>>,
}

impl MemoryHiScoreStore {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Rc::new(RefCell::new(Some(text.to_string()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl HiScoreStore for MemoryHiScoreStore {
    fn load(&mut self) -> io::Result<String> {
        self.text
            .borrow()
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no high scores saved"))
    }

    fn save(&mut self, text: &str) -> io::Result<()> {
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Non-send resource wrapper for the host's high score store.
pub struct HiScoreResource(pub Box<dyn HiScoreStore>);

/// The most recently loaded or written table.
#[derive(Resource, Debug, Clone, Default)]
pub struct HiScores(pub HiScoreTable);

/// Reads the table, falling back to the built-in one when the store cannot be read.
pub fn load(store: &mut dyn HiScoreStore) -> HiScoreTable {
    match store.load() {
        Ok(text) => HiScoreTable::parse(&text),
        Err(error) => {
            debug!(%error, "High scores unavailable, using defaults");
            HiScoreTable::default()
        }
    }
}

/// Merges a finished game's score into the stored table and writes it back.
pub fn record(store: &mut dyn HiScoreStore, name: &str, score: u32) -> HiScoreTable {
    let table = load(store).merged(HiScoreEntry::new(name, score));
    match store.save(&table.serialize()) {
        Ok(()) => info!(name, score = %score.separate_with_commas(), "High scores updated"),
        Err(error) => warn!(%error, "Failed to write high scores"),
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_file_is_padded_from_defaults() {
        let table = HiScoreTable::parse("500000 Zed\ngarbage\n");
        let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "David", "Andy", "Count Pacula", "Cleopacra", "Brett Favre"]);
    }

    #[test]
    fn names_and_scores_are_clamped() {
        let table = HiScoreTable::parse("99999999999 An Extremely Long Player Name Here\n");
        let top = &table.entries()[0];
        assert_eq!(top.score, score::MAX);
        assert_eq!(top.name.chars().count(), hiscore::NAME_WIDTH);
    }

    #[test]
    fn merge_keeps_six_sorted() {
        let table = HiScoreTable::default().merged(HiScoreEntry::new("Newcomer", 50_000));
        let scores: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![100_000, 80_000, 60_000, 50_000, 40_000, 20_000]);
    }

    #[test]
    fn display_lines_are_fixed_width() {
        let lines = HiScoreTable::default().display_lines();
        assert!(lines.iter().all(|l| l.len() == hiscore::NAME_WIDTH + hiscore::SCORE_WIDTH));
        assert!(lines[0].ends_with("   100000"));
    }

    #[test]
    fn unreadable_store_falls_back_to_defaults() {
        let mut store = MemoryHiScoreStore::default();
        assert_eq!(load(&mut store), HiScoreTable::default());
    }

    #[test]
    fn record_writes_back_merged_table() {
        let mut store = MemoryHiScoreStore::default();
        let table = record(&mut store, "Player", 70_000);
        assert_eq!(table.entries()[2], HiScoreEntry::new("Player", 70_000));
        assert!(store.contents().unwrap().contains("70000 Player\n"));
    }
}
