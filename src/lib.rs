pub mod calendar;
pub mod grid;
pub(crate) mod grid_validation;
pub mod logging;
pub mod persistence;
pub mod planner;
pub mod subject;

pub use calendar::{Day, HourSlot};
pub use grid::{Cell, Coordinate, DayColumn, Grid};
pub use logging::{default_log_level, init_logging, logging_status};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteSlotStore;
pub use persistence::{
    FileSlotStore, GRID_SLOT_KEY, MemorySlotStore, PersistenceError, SlotStore, decode_grid,
    encode_grid, load_grid_from_csv, save_grid_to_csv,
};
pub use planner::{CLEAR_ALL_PROMPT, Confirm, PlannerError, TimetablePlanner};
pub use subject::Subject;
