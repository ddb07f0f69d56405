use timetable_planner::{
    CLEAR_ALL_PROMPT, Coordinate, GRID_SLOT_KEY, Grid, MemorySlotStore, PersistenceError,
    PlannerError, SlotStore, TimetablePlanner, decode_grid, encode_grid,
    persistence::PersistenceResult,
};

fn empty_planner() -> TimetablePlanner<MemorySlotStore> {
    TimetablePlanner::initialize(MemorySlotStore::new())
}

fn populated(grid: &Grid) -> Vec<(usize, usize)> {
    grid.populated()
        .map(|(c, _)| (c.day_index(), c.hour_index()))
        .collect()
}

fn persisted(planner: &TimetablePlanner<MemorySlotStore>) -> Grid {
    let snapshot = planner
        .store()
        .read_slot(GRID_SLOT_KEY)
        .unwrap()
        .expect("grid should be persisted");
    decode_grid(&snapshot).unwrap()
}

struct ReadOnlyStore {
    inner: MemorySlotStore,
}

impl SlotStore for ReadOnlyStore {
    fn read_slot(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.inner.read_slot(key)
    }

    fn write_slot(&mut self, _key: &str, _value: &str) -> PersistenceResult<()> {
        Err(PersistenceError::InvalidData("store is read-only".into()))
    }
}

struct BrokenStore;

impl SlotStore for BrokenStore {
    fn read_slot(&self, _key: &str) -> PersistenceResult<Option<String>> {
        Err(PersistenceError::InvalidData("disk on fire".into()))
    }

    fn write_slot(&mut self, _key: &str, _value: &str) -> PersistenceResult<()> {
        Ok(())
    }
}

#[test]
fn initialize_without_snapshot_starts_empty_at_origin() {
    let planner = empty_planner();
    assert!(planner.grid().is_empty());
    assert_eq!(planner.selection(), Coordinate::new(0, 0).unwrap());
    assert_eq!(planner.selected_label(), "Mon at 7:00");
    assert_eq!(planner.store().write_count(), 1);
    assert_eq!(persisted(&planner), Grid::empty());
}

#[test]
fn initialize_discards_malformed_snapshots() {
    for snapshot in ["not json", "[]", r#"{"day":"Mon"}"#] {
        let store = MemorySlotStore::with_slot(GRID_SLOT_KEY, snapshot);
        let planner = TimetablePlanner::initialize(store);
        assert!(planner.grid().is_empty(), "snapshot {snapshot:?} should be ignored");
        assert_eq!(persisted(&planner), Grid::empty());
    }
}

#[test]
fn initialize_survives_failed_fallback_write() {
    let store = ReadOnlyStore {
        inner: MemorySlotStore::with_slot(GRID_SLOT_KEY, "garbage"),
    };
    let planner = TimetablePlanner::initialize(store);
    assert!(planner.grid().is_empty());
}

#[test]
fn initialize_discards_unreadable_store() {
    let planner = TimetablePlanner::initialize(BrokenStore);
    assert_eq!(planner.grid(), &Grid::empty());
}

#[test]
fn initialize_restores_persisted_grid() {
    let snapshot = encode_grid(&Grid::sample()).unwrap();
    let planner = TimetablePlanner::initialize(MemorySlotStore::with_slot(GRID_SLOT_KEY, snapshot));
    assert_eq!(planner.grid(), &Grid::sample());
    assert_eq!(planner.store().write_count(), 0);
}

#[test]
fn select_then_assign_writes_catalog_subject() {
    let mut planner = empty_planner();
    planner.select(0, 2).unwrap();
    assert!(planner.assign("Math homework", "math").unwrap());

    assert_eq!(populated(planner.grid()), vec![(0, 2)]);
    let cell = planner.grid().cell(0, 2).unwrap();
    assert_eq!(cell.title, "Math homework");
    assert_eq!(cell.subject, "Math");
    assert_eq!(cell.glyph, "📐");
    assert_eq!(cell.color, "#3b82f6");
    assert_eq!(&persisted(&planner), planner.grid());
}

#[test]
fn assign_trims_title_and_overwrites_existing_cell() {
    let mut planner = empty_planner();
    planner.select(3, 5).unwrap();
    planner.assign("Essay draft", "eng").unwrap();
    planner.assign("  Dig site notes  ", "hist").unwrap();

    let cell = planner.grid().cell(3, 5).unwrap();
    assert_eq!(cell.title, "Dig site notes");
    assert_eq!(cell.subject, "History");
    assert_eq!(planner.grid().populated_count(), 1);
}

#[test]
fn assign_with_unknown_subject_leaves_subject_fields_empty() {
    let mut planner = empty_planner();
    planner.assign("Free reading", "chem").unwrap();

    let cell = planner.grid().cell(0, 0).unwrap();
    assert_eq!(cell.subject, "");
    assert_eq!(cell.glyph, "");
    assert_eq!(cell.color, "#ddd");
}

#[test]
fn assign_matches_subject_ids_exactly() {
    let mut planner = empty_planner();
    planner.assign("Padded id", " math ").unwrap();

    let cell = planner.grid().cell(0, 0).unwrap();
    assert_eq!(cell.subject, "");
    assert_eq!(cell.color, "#ddd");
}

#[test]
fn assign_with_blank_title_is_a_no_op() {
    let mut planner = empty_planner();
    planner.load_sample().unwrap();
    let before = planner.snapshot();
    let writes = planner.store().write_count();

    for title in ["", "   ", "\t\n"] {
        assert!(!planner.assign(title, "math").unwrap());
    }
    assert_eq!(planner.grid(), &before);
    assert_eq!(planner.store().write_count(), writes);
}

#[test]
fn out_of_bounds_indices_are_rejected() {
    let mut planner = empty_planner();
    planner.select(2, 3).unwrap();
    let writes = planner.store().write_count();

    let err = planner.select(7, 0).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::InvalidIndex {
            day_index: 7,
            hour_index: 0
        }
    ));
    assert!(planner.select(0, 12).is_err());
    assert_eq!(planner.selection(), Coordinate::new(2, 3).unwrap());

    assert!(matches!(
        planner.clear_slot(0, 99),
        Err(PlannerError::InvalidIndex { .. })
    ));
    assert_eq!(planner.store().write_count(), writes);
}

#[test]
fn clear_slot_after_assign_touches_only_that_coordinate() {
    for day_index in 0..7 {
        for hour_index in 0..12 {
            let mut planner = empty_planner();
            planner.load_sample().unwrap();
            planner.select(day_index, hour_index).unwrap();
            planner.assign("Revise", "bio").unwrap();
            planner.clear_slot(day_index, hour_index).unwrap();

            assert!(planner.grid().cell(day_index, hour_index).is_none());
            let mut expected = Grid::sample();
            expected.set(Coordinate::new(day_index, hour_index).unwrap(), None);
            assert_eq!(planner.grid(), &expected);
        }
    }
}

#[test]
fn clear_all_requires_confirmation() {
    let mut planner = empty_planner();
    planner.load_sample().unwrap();
    let writes = planner.store().write_count();

    let mut asked = Vec::new();
    let mut decline = |prompt: &str| {
        asked.push(prompt.to_string());
        false
    };
    assert!(!planner.clear_all(&mut decline).unwrap());
    assert_eq!(asked, vec![CLEAR_ALL_PROMPT.to_string()]);
    assert_eq!(planner.grid(), &Grid::sample());
    assert_eq!(planner.store().write_count(), writes);
    assert_eq!(persisted(&planner), Grid::sample());

    assert!(planner.clear_all(&mut |_: &str| true).unwrap());
    assert_eq!(planner.store().write_count(), writes + 1);
    assert!(planner.grid().is_empty());
    assert_eq!(planner.grid().columns().len(), 7);
    assert!(persisted(&planner).is_empty());
}

#[test]
fn load_sample_is_deterministic() {
    let mut planner = empty_planner();
    planner.load_sample().unwrap();
    let first = planner.store().read_slot(GRID_SLOT_KEY).unwrap();
    planner.select(1, 1).unwrap();
    planner.assign("Interlude", "math").unwrap();
    planner.load_sample().unwrap();
    let second = planner.store().read_slot(GRID_SLOT_KEY).unwrap();

    assert_eq!(first, second);
    assert_eq!(populated(planner.grid()), vec![(0, 2), (2, 4), (4, 1)]);
}

#[test]
fn snapshots_are_unaffected_by_later_mutations() {
    let mut planner = empty_planner();
    planner.load_sample().unwrap();
    let before = planner.snapshot();

    planner.clear_slot(0, 2).unwrap();
    assert!(before.cell(0, 2).is_some());
    assert!(planner.grid().cell(0, 2).is_none());
}

#[test]
fn failed_write_keeps_previous_grid() {
    let store = ReadOnlyStore {
        inner: MemorySlotStore::with_slot(GRID_SLOT_KEY, encode_grid(&Grid::sample()).unwrap()),
    };
    let mut planner = TimetablePlanner::initialize(store);

    let err = planner.clear_slot(0, 2).unwrap_err();
    assert!(matches!(err, PlannerError::Persistence(_)));
    assert_eq!(planner.grid(), &Grid::sample());

    assert!(planner.assign("Lost", "math").is_err());
    assert!(planner.grid().cell(0, 0).is_none());
}

#[test]
fn reinitializing_on_same_store_resumes_grid_but_not_selection() {
    let mut planner = empty_planner();
    planner.select(6, 11).unwrap();
    planner.assign("Weekly review", "hist").unwrap();
    let store = planner.into_store();

    let resumed = TimetablePlanner::initialize(store);
    assert_eq!(resumed.selection(), Coordinate::default());
    assert_eq!(
        resumed.grid().cell(6, 11).map(|c| c.title.as_str()),
        Some("Weekly review")
    );
}
