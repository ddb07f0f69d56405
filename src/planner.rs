use crate::grid::{Cell, Coordinate, Grid};
use crate::persistence::{self, GRID_SLOT_KEY, PersistenceError, SlotStore};
use crate::subject::Subject;
use log::{debug, info, warn};
use thiserror::Error;

pub const CLEAR_ALL_PROMPT: &str = "Clear all timetable data?";

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("coordinate (day {day_index}, hour {hour_index}) is outside the 7x12 grid")]
    InvalidIndex { day_index: usize, hour_index: usize },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Yes/no question asked before destructive operations.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Holds the weekly grid and the current selection, writing the grid to
/// `store` after every mutation.
///
/// A mutation builds the next grid from a copy, persists it, and only then
/// replaces the in-memory grid. When the write fails the call returns the
/// error and the planner keeps its previous grid.
pub struct TimetablePlanner<S: SlotStore> {
    store: S,
    grid: Grid,
    selection: Coordinate,
}

impl<S: SlotStore> TimetablePlanner<S> {
    /// Restores the grid persisted in `store`, or starts from an empty week.
    ///
    /// Missing, unreadable and malformed snapshots all fall back to an empty
    /// grid; the reason is logged, never returned. The fallback grid is
    /// written back so the slot matches memory from the start.
    pub fn initialize(mut store: S) -> Self {
        let restored = match store.read_slot(GRID_SLOT_KEY) {
            Ok(Some(snapshot)) => match persistence::decode_grid(&snapshot) {
                Ok(grid) => {
                    info!(
                        "event=grid_restore module=planner status=ok populated={}",
                        grid.populated_count()
                    );
                    Some(grid)
                }
                Err(err) => {
                    warn!(
                        "event=grid_restore module=planner status=fallback reason=malformed error={err}"
                    );
                    None
                }
            },
            Ok(None) => {
                info!("event=grid_restore module=planner status=fallback reason=missing");
                None
            }
            Err(err) => {
                warn!(
                    "event=grid_restore module=planner status=fallback reason=read_failed error={err}"
                );
                None
            }
        };

        let grid = match restored {
            Some(grid) => grid,
            None => {
                let grid = Grid::empty();
                let written = persistence::encode_grid(&grid)
                    .and_then(|snapshot| store.write_slot(GRID_SLOT_KEY, &snapshot));
                match written {
                    Ok(()) => debug!("event=grid_persist module=planner status=ok op=initialize"),
                    Err(err) => warn!(
                        "event=grid_persist module=planner status=error op=initialize error={err}"
                    ),
                }
                grid
            }
        };

        Self {
            store,
            grid,
            selection: Coordinate::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Owned copy of the current grid; later mutations do not affect it.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub fn selection(&self) -> Coordinate {
        self.selection
    }

    /// Human-readable selection, e.g. `Mon at 7:00`.
    pub fn selected_label(&self) -> String {
        format!("{} at {}", self.selection.day(), self.selection.hour())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn select(&mut self, day_index: usize, hour_index: usize) -> PlannerResult<()> {
        self.selection = coordinate(day_index, hour_index)?;
        Ok(())
    }

    /// Writes a task into the selected slot, replacing whatever was there.
    ///
    /// Returns `Ok(false)` without touching the grid or the store when the
    /// trimmed title is empty. Unknown subject ids yield a cell with empty
    /// subject fields.
    pub fn assign(&mut self, title: &str, subject_id: &str) -> PlannerResult<bool> {
        let title = title.trim();
        if title.is_empty() {
            debug!("event=grid_assign module=planner status=skipped reason=empty_title");
            return Ok(false);
        }

        let subject = Subject::find(subject_id);
        if subject.is_none() {
            warn!("event=grid_assign module=planner status=unknown_subject subject_id={subject_id}");
        }
        let cell = Cell::new(title, subject);
        let selection = self.selection;
        self.commit("assign", |grid| grid.set(selection, Some(cell)))?;
        Ok(true)
    }

    pub fn clear_slot(&mut self, day_index: usize, hour_index: usize) -> PlannerResult<()> {
        let target = coordinate(day_index, hour_index)?;
        self.commit("clear_slot", |grid| grid.set(target, None))
    }

    /// Empties the whole week once `confirm` agrees.
    ///
    /// Returns `Ok(false)` and leaves everything untouched when declined.
    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> PlannerResult<bool> {
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            debug!("event=grid_clear_all module=planner status=declined");
            return Ok(false);
        }
        self.commit("clear_all", |grid| *grid = Grid::empty())?;
        Ok(true)
    }

    pub fn load_sample(&mut self) -> PlannerResult<()> {
        self.commit("load_sample", |grid| *grid = Grid::sample())
    }

    /// Replaces the week with `grid`, e.g. one read back from a CSV export.
    pub fn replace_grid(&mut self, grid: Grid) -> PlannerResult<()> {
        self.commit("replace", |current| *current = grid)
    }

    fn commit<F>(&mut self, op: &str, mutate: F) -> PlannerResult<()>
    where
        F: FnOnce(&mut Grid),
    {
        let mut next = self.grid.clone();
        mutate(&mut next);

        let snapshot = persistence::encode_grid(&next)?;
        if let Err(err) = self.store.write_slot(GRID_SLOT_KEY, &snapshot) {
            warn!("event=grid_persist module=planner status=error op={op} error={err}");
            return Err(err.into());
        }

        debug!(
            "event=grid_persist module=planner status=ok op={op} populated={} bytes={}",
            next.populated_count(),
            snapshot.len()
        );
        self.grid = next;
        Ok(())
    }
}

fn coordinate(day_index: usize, hour_index: usize) -> PlannerResult<Coordinate> {
    Coordinate::new(day_index, hour_index).ok_or(PlannerError::InvalidIndex {
        day_index,
        hour_index,
    })
}
