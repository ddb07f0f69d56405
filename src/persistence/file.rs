use super::{PersistenceError, PersistenceResult, SlotStore};
use crate::calendar::{Day, HourSlot};
use crate::grid::{Cell, Coordinate, Grid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Slot store keeping one `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> PersistenceResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidData(format!(
                "invalid slot key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStore for FileSlotStore {
    fn read_slot(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.slot_path(key)?;
        // Readers never observe a half-written slot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct CellCsvRecord {
    day: String,
    hour: String,
    title: String,
    subject: String,
    emoji: String,
    color: String,
}

impl CellCsvRecord {
    fn from_cell(coordinate: Coordinate, cell: &Cell) -> Self {
        Self {
            day: coordinate.day().label().to_string(),
            hour: coordinate.hour().hour().to_string(),
            title: cell.title.clone(),
            subject: cell.subject.clone(),
            emoji: cell.glyph.clone(),
            color: cell.color.clone(),
        }
    }

    fn into_entry(self) -> PersistenceResult<(Coordinate, Cell)> {
        let day: Day = self
            .day
            .parse()
            .map_err(|err| PersistenceError::InvalidData(format!("{err}")))?;
        let hour = self
            .hour
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(HourSlot::from_hour)
            .ok_or_else(|| {
                PersistenceError::InvalidData(format!(
                    "hour '{}' is outside the 7..18 range",
                    self.hour
                ))
            })?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "empty title at {day} {hour}"
            )));
        }
        let cell = Cell {
            title: title.to_string(),
            subject: self.subject,
            glyph: self.emoji,
            color: self.color,
        };
        Ok((Coordinate::from((day, hour)), cell))
    }
}

/// Writes one CSV row per populated cell, day-major.
pub fn save_grid_to_csv<P: AsRef<Path>>(grid: &Grid, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (coordinate, cell) in grid.populated() {
        writer.serialize(CellCsvRecord::from_cell(coordinate, cell))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_grid_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Grid> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut grid = Grid::empty();
    let mut seen = HashSet::new();
    for record in reader.deserialize::<CellCsvRecord>() {
        let (coordinate, cell) = record?.into_entry()?;
        if !seen.insert(coordinate) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate entry for {} {}",
                coordinate.day(),
                coordinate.hour()
            )));
        }
        grid.set(coordinate, Some(cell));
    }
    Ok(grid)
}
