use crate::calendar::{DAY_COUNT, Day, HOUR_COUNT, HourSlot};
use crate::subject::{FALLBACK_COLOR, Subject};
use serde::{Deserialize, Serialize};

/// A scheduled task occupying one (day, hour) coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub title: String,
    pub subject: String,
    #[serde(rename = "emoji")]
    pub glyph: String,
    pub color: String,
}

impl Cell {
    /// Builds a cell for `title`, copying the display fields of `subject`.
    ///
    /// Without a subject the name and glyph stay empty and the color falls
    /// back to [`FALLBACK_COLOR`].
    pub fn new(title: impl Into<String>, subject: Option<&Subject>) -> Self {
        match subject {
            Some(subject) => Self {
                title: title.into(),
                subject: subject.name.to_string(),
                glyph: subject.glyph.to_string(),
                color: subject.color.to_string(),
            },
            None => Self {
                title: title.into(),
                subject: String::new(),
                glyph: String::new(),
                color: FALLBACK_COLOR.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayColumn {
    pub day: Day,
    pub slots: Vec<Option<Cell>>,
}

impl DayColumn {
    fn empty(day: Day) -> Self {
        Self {
            day,
            slots: vec![None; HOUR_COUNT],
        }
    }
}

/// In-bounds (day, hour) position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    day_index: usize,
    hour_index: usize,
}

impl Coordinate {
    pub fn new(day_index: usize, hour_index: usize) -> Option<Self> {
        (day_index < DAY_COUNT && hour_index < HOUR_COUNT).then_some(Self {
            day_index,
            hour_index,
        })
    }

    pub fn day_index(self) -> usize {
        self.day_index
    }

    pub fn hour_index(self) -> usize {
        self.hour_index
    }

    pub fn day(self) -> Day {
        Day::ALL[self.day_index]
    }

    pub fn hour(self) -> HourSlot {
        HourSlot::from_index_unchecked(self.hour_index)
    }
}

impl From<(Day, HourSlot)> for Coordinate {
    fn from((day, hour): (Day, HourSlot)) -> Self {
        Self {
            day_index: day.index(),
            hour_index: hour.index(),
        }
    }
}

/// The weekly 7×12 matrix. Always exactly [`DAY_COUNT`] columns of
/// [`HOUR_COUNT`] slots, in Mon..Sun order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    columns: Vec<DayColumn>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub fn empty() -> Self {
        Self {
            columns: Day::ALL.into_iter().map(DayColumn::empty).collect(),
        }
    }

    /// Demonstration week with three tasks filled in.
    pub fn sample() -> Self {
        let mut grid = Self::empty();
        let entries = [
            (0, 2, "Math homework", "math"),
            (2, 4, "Read chapter", "eng"),
            (4, 1, "Biology lab prep", "bio"),
        ];
        for (day_index, hour_index, title, subject_id) in entries {
            if let Some(coordinate) = Coordinate::new(day_index, hour_index) {
                grid.set(coordinate, Some(Cell::new(title, Subject::find(subject_id))));
            }
        }
        grid
    }

    /// Wraps already validated columns.
    pub(crate) fn from_columns_unchecked(columns: Vec<DayColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[DayColumn] {
        &self.columns
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<&Cell> {
        self.columns[coordinate.day_index].slots[coordinate.hour_index].as_ref()
    }

    /// Cell lookup by raw indices; out-of-bounds positions read as empty.
    pub fn cell(&self, day_index: usize, hour_index: usize) -> Option<&Cell> {
        Coordinate::new(day_index, hour_index).and_then(|coordinate| self.get(coordinate))
    }

    pub fn set(&mut self, coordinate: Coordinate, cell: Option<Cell>) {
        self.columns[coordinate.day_index].slots[coordinate.hour_index] = cell;
    }

    /// Populated coordinates in day-major order.
    pub fn populated(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        self.columns.iter().enumerate().flat_map(|(day_index, column)| {
            column
                .slots
                .iter()
                .enumerate()
                .filter_map(move |(hour_index, slot)| {
                    slot.as_ref().map(|cell| {
                        (
                            Coordinate {
                                day_index,
                                hour_index,
                            },
                            cell,
                        )
                    })
                })
        })
    }

    pub fn populated_count(&self) -> usize {
        self.populated().count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated().next().is_none()
    }
}
