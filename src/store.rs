//! Per-level override store and its on-disk format.
//!
//! Only levels whose settings differ from the user's defaults are kept.
//! The defaults are passed in on every comparison because the user may
//! change them between sessions.
//!
//! File layout, little-endian:
//!
//! ```text
//! header:  version: i32 (= 1), count: i32
//! record:  new_best: u8, complete: u8, id: i32, percent: i16   (x count)
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// The only file version this build reads or writes.
pub const FORMAT_VERSION: i32 = 1;

/// Bytes per serialized record.
const RECORD_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// User defaults applied to every level without an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub new_best: bool,
    pub complete: bool,
    pub percent: i16,
}

/// Screenshot settings for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOverride {
    pub id: i32,
    pub screenshot_on_new_best: bool,
    pub screenshot_on_complete: bool,
    /// Minimum percent a new best must reach to be captured, in [1,100].
    pub percent: i16,
}

impl LevelOverride {
    /// Record for `id` carrying the defaults.
    pub fn from_defaults(id: i32, defaults: &Defaults) -> Self {
        Self {
            id,
            screenshot_on_new_best: defaults.new_best,
            screenshot_on_complete: defaults.complete,
            percent: defaults.percent,
        }
    }

    pub fn is_default(&self, defaults: &Defaults) -> bool {
        self.screenshot_on_new_best == defaults.new_best
            && self.screenshot_on_complete == defaults.complete
            && self.percent == defaults.percent
    }

    /// Compares the three settings, ignoring `id`.
    pub fn same_settings(&self, other: &LevelOverride) -> bool {
        self.screenshot_on_new_best == other.screenshot_on_new_best
            && self.screenshot_on_complete == other.screenshot_on_complete
            && self.percent == other.percent
    }

    fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0] = u8::from(self.screenshot_on_new_best);
        buf[1] = u8::from(self.screenshot_on_complete);
        buf[2..6].copy_from_slice(&self.id.to_le_bytes());
        buf[6..8].copy_from_slice(&self.percent.to_le_bytes());
        buf
    }

    fn decode(buf: &[u8; RECORD_LEN]) -> Self {
        Self {
            screenshot_on_new_best: buf[0] != 0,
            screenshot_on_complete: buf[1] != 0,
            id: i32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]),
            percent: i16::from_le_bytes([buf[6], buf[7]]),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The settings file could not be opened. `NotFound` on first run.
    #[error("cannot open {}: {source}", path.display())]
    FileUnavailable { path: PathBuf, source: io::Error },

    #[error("unsupported settings version {found} (expected {FORMAT_VERSION})")]
    VersionMismatch { found: i32 },

    #[error("corrupt settings file: {0}")]
    Corrupt(String),

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl StoreError {
    /// True when the file simply does not exist yet.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, StoreError::FileUnavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

fn read_i32(reader: &mut impl Read, what: &str) -> Result<i32, StoreError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| StoreError::Corrupt(format!("reading {what}: {e}")))?;
    Ok(i32::from_le_bytes(buf))
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Reads a whole settings file. Any short read rejects the file.
pub fn read_levels(reader: &mut impl Read) -> Result<Vec<LevelOverride>, StoreError> {
    let version = read_i32(reader, "version")?;
    if version != FORMAT_VERSION {
        return Err(StoreError::VersionMismatch { found: version });
    }

    let count = read_i32(reader, "record count")?;
    let count = usize::try_from(count)
        .map_err(|_| StoreError::Corrupt(format!("negative record count {count}")))?;

    // Capacity is bounded so a garbage count cannot force a huge allocation.
    let mut levels = Vec::with_capacity(count.min(4096));
    let mut buf = [0u8; RECORD_LEN];
    for index in 0..count {
        reader.read_exact(&mut buf).map_err(|e| {
            StoreError::Corrupt(format!("record {index} of {count}: {e}"))
        })?;
        levels.push(LevelOverride::decode(&buf));
    }
    Ok(levels)
}

/// Writes the header and `levels` in order.
pub fn write_levels(writer: &mut impl Write, levels: &[&LevelOverride]) -> io::Result<()> {
    let count = i32::try_from(levels.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many records"))?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&count.to_le_bytes())?;
    for level in levels {
        writer.write_all(&level.encode())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// What `SettingsStore::upsert` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Removed,
    Unchanged,
}

/// In-memory list of level overrides backed by one binary file.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    levels: Vec<LevelOverride>,
}

impl SettingsStore {
    /// Empty store bound to `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            levels: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn levels(&self) -> &[LevelOverride] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Replaces the in-memory list with the file contents.
    ///
    /// On any error the list is left empty; a partially read file never
    /// leaks records.
    pub fn load(&mut self) -> Result<usize, StoreError> {
        self.levels.clear();

        let file = File::open(&self.path).map_err(|source| StoreError::FileUnavailable {
            path: self.path.clone(),
            source,
        })?;
        self.levels = read_levels(&mut BufReader::new(file))?;

        log::info!(
            "store: loaded settings for {} levels from {}",
            self.levels.len(),
            self.path.display()
        );
        Ok(self.levels.len())
    }

    /// Writes every record that differs from `defaults`, returning how many.
    ///
    /// The data goes to a sibling temp file first and is renamed over the
    /// target, so a failed save leaves the previous file intact.
    pub fn save(&self, defaults: &Defaults) -> Result<usize, StoreError> {
        let to_save: Vec<&LevelOverride> = self
            .levels
            .iter()
            .filter(|level| !level.is_default(defaults))
            .collect();

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let tmp_path = self.tmp_path();
        let result = File::create(&tmp_path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_levels(&mut writer, &to_save)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()
        });
        if let Err(e) = result.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }

        log::info!(
            "store: saved {} level settings to {} ({} at defaults skipped)",
            to_save.len(),
            self.path.display(),
            self.levels.len() - to_save.len()
        );
        Ok(to_save.len())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Merges `record` into the store.
    ///
    /// A record equal to the defaults removes any existing entry for its id.
    /// Otherwise an existing entry is overwritten when its settings differ,
    /// or the record is appended.
    pub fn upsert(&mut self, record: LevelOverride, defaults: &Defaults) -> UpsertOutcome {
        let existing = self.levels.iter().position(|level| level.id == record.id);

        match existing {
            _ if record.is_default(defaults) => {
                let before = self.levels.len();
                self.levels.retain(|level| level.id != record.id);
                if self.levels.len() == before {
                    return UpsertOutcome::Unchanged;
                }
                log::debug!("store: level {} back at defaults, removed", record.id);
                UpsertOutcome::Removed
            }
            Some(index) if self.levels[index].same_settings(&record) => UpsertOutcome::Unchanged,
            Some(index) => {
                self.levels[index] = record;
                log::debug!("store: updated settings for level {}", record.id);
                UpsertOutcome::Updated
            }
            None => {
                self.levels.push(record);
                log::info!("store: added settings for level {}", record.id);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn find(&self, id: i32) -> Option<&LevelOverride> {
        self.levels.iter().find(|level| level.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DEFAULTS: Defaults = Defaults {
        new_best: false,
        complete: true,
        percent: 50,
    };

    fn level(id: i32, new_best: bool, complete: bool, percent: i16) -> LevelOverride {
        LevelOverride {
            id,
            screenshot_on_new_best: new_best,
            screenshot_on_complete: complete,
            percent,
        }
    }

    fn encode(levels: &[LevelOverride]) -> Vec<u8> {
        let refs: Vec<&LevelOverride> = levels.iter().collect();
        let mut out = Vec::new();
        write_levels(&mut out, &refs).unwrap();
        out
    }

    #[test]
    fn record_layout_is_packed_little_endian() {
        let bytes = encode(&[level(0x0102_0304, true, false, 75)]);
        assert_eq!(
            bytes,
            vec![
                1, 0, 0, 0, // version
                1, 0, 0, 0, // count
                1, 0, // flags
                0x04, 0x03, 0x02, 0x01, // id
                75, 0, // percent
            ]
        );
    }

    #[test]
    fn codec_preserves_order() {
        let levels = [level(9, true, true, 10), level(3, false, false, 100)];
        let decoded = read_levels(&mut Cursor::new(encode(&levels))).unwrap();
        assert_eq!(decoded, levels);
    }

    #[test]
    fn nonzero_bool_bytes_read_as_true() {
        let mut bytes = encode(&[level(1, false, false, 20)]);
        bytes[8] = 0xFF;
        let decoded = read_levels(&mut Cursor::new(bytes)).unwrap();
        assert!(decoded[0].screenshot_on_new_best);
        assert!(!decoded[0].screenshot_on_complete);
    }

    #[test]
    fn version_two_is_rejected() {
        let mut bytes = encode(&[level(1, true, true, 20)]);
        bytes[0] = 2;
        let err = read_levels(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StoreError::VersionMismatch { found: 2 }));
    }

    #[test]
    fn truncated_record_rejects_file() {
        let mut bytes = encode(&[level(1, true, true, 20), level(2, true, true, 30)]);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            read_levels(&mut Cursor::new(bytes)),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn negative_count_is_corrupt() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            read_levels(&mut Cursor::new(bytes)),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn upsert_of_default_record_on_empty_store_is_noop() {
        let mut store = SettingsStore::new("unused.dat");
        let outcome = store.upsert(level(7, false, true, 50), &DEFAULTS);
        assert_eq!(outcome, UpsertOutcome::Unchanged);
        assert!(store.is_empty());
    }

    #[test]
    fn upsert_inserts_then_updates_then_removes() {
        let mut store = SettingsStore::new("unused.dat");

        assert_eq!(
            store.upsert(level(7, true, true, 50), &DEFAULTS),
            UpsertOutcome::Inserted
        );
        assert_eq!(store.levels(), &[level(7, true, true, 50)]);

        assert_eq!(
            store.upsert(level(7, true, false, 80), &DEFAULTS),
            UpsertOutcome::Updated
        );
        assert_eq!(store.find(7), Some(&level(7, true, false, 80)));

        assert_eq!(
            store.upsert(level(7, false, true, 50), &DEFAULTS),
            UpsertOutcome::Removed
        );
        assert_eq!(store.find(7), None);
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut once = SettingsStore::new("unused.dat");
        once.upsert(level(4, true, false, 30), &DEFAULTS);

        let mut twice = SettingsStore::new("unused.dat");
        twice.upsert(level(4, true, false, 30), &DEFAULTS);
        let second = twice.upsert(level(4, true, false, 30), &DEFAULTS);

        assert_eq!(second, UpsertOutcome::Unchanged);
        assert_eq!(once.levels(), twice.levels());
    }

    #[test]
    fn upsert_keeps_ids_unique() {
        let mut store = SettingsStore::new("unused.dat");
        for (id, percent) in [(1, 10), (2, 20), (1, 30), (3, 40), (2, 60), (1, 70)] {
            store.upsert(level(id, true, true, percent), &DEFAULTS);
        }
        let mut ids: Vec<i32> = store.levels().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        ids.dedup();
        assert_eq!(ids.len(), store.len());
        assert_eq!(store.find(1).map(|l| l.percent), Some(70));
    }

    #[test]
    fn save_then_load_keeps_only_non_default_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autoscreenshot_settings.dat");

        let mut store = SettingsStore::new(&path);
        store.upsert(level(7, false, true, 50), &DEFAULTS);
        store.upsert(level(7, true, true, 50), &DEFAULTS);
        store.upsert(level(12, false, false, 90), &DEFAULTS);
        assert_eq!(store.save(&DEFAULTS).unwrap(), 2);

        let mut reloaded = SettingsStore::new(&path);
        assert_eq!(reloaded.load().unwrap(), 2);
        assert_eq!(
            reloaded.levels(),
            &[level(7, true, true, 50), level(12, false, false, 90)]
        );
    }

    #[test]
    fn save_filters_against_current_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.dat");

        let mut store = SettingsStore::new(&path);
        store.upsert(level(1, true, true, 50), &DEFAULTS);
        store.upsert(level(2, true, false, 20), &DEFAULTS);

        // The user changed the defaults so level 1 now matches them.
        let changed = Defaults {
            new_best: true,
            complete: true,
            percent: 50,
        };
        assert_eq!(store.save(&changed).unwrap(), 1);

        let mut reloaded = SettingsStore::new(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.levels(), &[level(2, true, false, 20)]);
    }

    #[test]
    fn load_of_missing_file_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::new(dir.path().join("absent.dat"));
        let err = store.load().unwrap_err();
        assert!(err.is_missing_file());
        assert!(store.is_empty());
    }

    #[test]
    fn load_of_unknown_version_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.dat");
        let mut bytes = encode(&[level(1, true, true, 20)]);
        bytes[0] = 2;
        fs::write(&path, bytes).unwrap();

        let mut store = SettingsStore::new(&path);
        store.upsert(level(5, true, true, 5), &DEFAULTS);
        assert!(matches!(
            store.load(),
            Err(StoreError::VersionMismatch { found: 2 })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn save_creates_parent_directory_and_cleans_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.dat");

        let mut store = SettingsStore::new(&path);
        store.upsert(level(3, true, true, 99), &DEFAULTS);
        store.save(&DEFAULTS).unwrap();

        assert!(path.exists());
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn failed_save_leaves_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.dat");

        let mut store = SettingsStore::new(&path);
        store.upsert(level(3, true, true, 99), &DEFAULTS);
        store.save(&DEFAULTS).unwrap();
        let before = fs::read(&path).unwrap();

        // A directory squatting on the temp path makes File::create fail.
        fs::create_dir(store.tmp_path()).unwrap();
        store.upsert(level(4, true, true, 10), &DEFAULTS);
        assert!(matches!(
            store.save(&DEFAULTS),
            Err(StoreError::Write { .. })
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
