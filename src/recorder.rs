// Statistics per table, and the places they can be kept between runs.

use crate::traits::{DrillError, MergeOutcome, SessionReport, Storage, TableId, TableStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All statistics, keyed by table. Only holds them in memory, but it is (de)serializable so the
/// storages can write it out as a whole.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StatisticsStore {
    tables: BTreeMap<TableId, TableStats>,
}

impl StatisticsStore {
    pub fn new() -> Self {
        StatisticsStore {
            tables: Default::default(),
        }
    }

    pub fn from(tables: &[(TableId, TableStats)]) -> Self {
        StatisticsStore {
            tables: tables.iter().copied().collect(),
        }
    }

    pub fn get(&self, table: TableId) -> Option<&TableStats> {
        self.tables.get(&table)
    }

    /// Iterate over the tables in ascending order.
    pub fn tables(&self) -> impl Iterator<Item = (TableId, &TableStats)> {
        self.tables.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Account a finished session to the report's table, creating the entry if it doesn't exist.
    /// Every merge is one attempt; the best time only ever goes down and only on a success.
    pub fn merge(&mut self, report: &SessionReport) -> MergeOutcome {
        let stats = self.tables.entry(report.table).or_default();
        stats.attempts += 1;

        let outcome = if report.success {
            stats.successes += 1;
            let previous = stats.best_time;
            match previous {
                Some(best) if report.elapsed_seconds >= best => {
                    MergeOutcome::BestUnchanged { best }
                }
                _ => {
                    stats.best_time = Some(report.elapsed_seconds);
                    MergeOutcome::NewRecord
                }
            }
        } else {
            stats.failures += 1;
            MergeOutcome::Failed
        };

        tracing::debug!(table = report.table, ?outcome, stats = ?stats, "merged session");
        outcome
    }
}

/// Storage that only keeps the statistics for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: StatisticsStore,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of times save was called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<StatisticsStore, DrillError> {
        Ok(self.store.clone())
    }

    fn save(&mut self, store: &StatisticsStore) -> Result<(), DrillError> {
        self.store = store.clone();
        self.saves += 1;
        Ok(())
    }
}

/// On disk representation, determined from the file extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, DrillError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(format!(
                "File type not supported for {}. Use .json or .yaml.",
                path.display()
            )
            .into()),
        }
    }
}

/// A storage that reads and writes a json or yaml file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    format: Format,
}

impl FileStorage {
    /// Create a storage for this file, nothing is read or written until load or save are called.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DrillError> {
        let path = path.as_ref().to_owned();
        let format = Format::from_path(&path)?;
        Ok(FileStorage { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Sibling of the target file, written first and then renamed over the target.
    fn temporary_path(&self) -> Result<PathBuf, DrillError> {
        let mut name = self
            .path
            .file_name()
            .ok_or_else(|| format!("no file name in {}", self.path.display()))?
            .to_os_string();
        name.push(".tmp");
        Ok(self.path.with_file_name(name))
    }

    fn write_to(&self, path: &Path, store: &StatisticsStore) -> Result<(), DrillError> {
        use std::fs::OpenOptions;
        use std::io::Write;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        match self.format {
            Format::Json => serde_json::to_writer_pretty(&mut writer, store)?,
            Format::Yaml => serde_yaml::to_writer(&mut writer, store)?,
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?
            .sync_all()?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<StatisticsStore, DrillError> {
        // Nothing written yet is a perfectly fine empty store, a file we can't read is not.
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no statistics yet");
            return Ok(Default::default());
        }

        let file = std::fs::File::open(&self.path)
            .map_err(|e| format!("failed to open {}: {e}", self.path.display()))?;
        let reader = std::io::BufReader::new(file);
        let store: StatisticsStore = match self.format {
            Format::Json => serde_json::from_reader(reader)
                .map_err(|e| format!("failed to parse {}: {e}", self.path.display()))?,
            Format::Yaml => serde_yaml::from_reader(reader)
                .map_err(|e| format!("failed to parse {}: {e}", self.path.display()))?,
        };

        tracing::debug!(path = %self.path.display(), tables = store.len(), "loaded statistics");
        Ok(store)
    }

    fn save(&mut self, store: &StatisticsStore) -> Result<(), DrillError> {
        let temporary = self.temporary_path()?;
        if let Err(e) = self.write_to(&temporary, store) {
            let _ = std::fs::remove_file(&temporary);
            return Err(e);
        }
        std::fs::rename(&temporary, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temporary);
            format!("failed to replace {}: {e}", self.path.display())
        })?;

        tracing::debug!(path = %self.path.display(), tables = store.len(), "saved statistics");
        Ok(())
    }
}
