use absence_core::{
    AbsenceStore, CalendarDay, CategoryRegistry, MemoryPort, PersistError, PersistResult,
    PersistencePort, RegistryError, StoreError, CATEGORIES_KEY, DEFAULT_CATEGORIES, RECORDS_KEY,
    SELECTED_CATEGORY_KEY,
};
use std::cell::Cell;

/// Port whose writes fail while `broken` is set, or only for `broken_key`.
struct FlakyPort {
    inner: MemoryPort,
    broken: Cell<bool>,
    broken_key: Cell<Option<&'static str>>,
}

impl FlakyPort {
    fn new() -> Self {
        Self {
            inner: MemoryPort::new(),
            broken: Cell::new(false),
            broken_key: Cell::new(None),
        }
    }
}

impl PersistencePort for FlakyPort {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, blob: &str) -> PersistResult<()> {
        if self.broken.get() || self.broken_key.get() == Some(key) {
            return Err(PersistError::Backend("disk full".to_string()));
        }
        self.inner.set(key, blob)
    }
}

fn day(y: i32, m: u32, d: u32) -> CalendarDay {
    CalendarDay::from_ymd(y, m, d).unwrap()
}

#[test]
fn failed_write_is_reported_but_change_is_kept() {
    let port = FlakyPort::new();
    let mut store = AbsenceStore::load(&port).unwrap();
    store.upsert(day(2024, 1, 1), "A").unwrap();

    port.broken.set(true);
    let err = store.upsert(day(2024, 1, 2), "B").unwrap_err();

    assert!(matches!(err, StoreError::Persistence(PersistError::Backend(_))));
    assert!(err.to_string().contains("disk full"));
    assert_eq!(store.find(day(2024, 1, 2)).unwrap().reason, "B");

    let durable = port.inner.get(RECORDS_KEY).unwrap().unwrap();
    assert!(!durable.contains("2024-01-02"));
}

#[test]
fn failed_remove_is_reported_but_day_stays_cleared() {
    let port = FlakyPort::new();
    let mut store = AbsenceStore::load(&port).unwrap();
    store.upsert(day(2024, 3, 1), "A").unwrap();

    port.broken.set(true);
    let err = store.remove(day(2024, 3, 1)).unwrap_err();

    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.find(day(2024, 3, 1)).is_none());
    assert!(store.is_empty());

    let durable = port.inner.get(RECORDS_KEY).unwrap().unwrap();
    assert!(durable.contains("2024-03-01"));
}

#[test]
fn next_successful_write_flushes_everything() {
    let port = FlakyPort::new();
    let mut store = AbsenceStore::load(&port).unwrap();

    port.broken.set(true);
    assert!(store.upsert(day(2024, 1, 1), "A").is_err());
    port.broken.set(false);
    store.upsert(day(2024, 1, 2), "B").unwrap();

    let reloaded = AbsenceStore::load(&port).unwrap();
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn registry_surfaces_failed_write_after_applying_add() {
    let port = FlakyPort::new();
    let mut registry = CategoryRegistry::load(&port).unwrap();

    port.broken.set(true);
    let err = registry.add("Course").unwrap_err();

    assert!(matches!(err, RegistryError::Persistence(_)));
    assert_eq!(registry.current(), Some("Course"));
}

#[test]
fn registry_surfaces_failed_write_after_applying_remove() {
    let port = FlakyPort::new();
    let mut registry = CategoryRegistry::load(&port).unwrap();

    port.broken.set(true);
    let err = registry.remove(DEFAULT_CATEGORIES[0]).unwrap_err();

    assert!(matches!(err, RegistryError::Persistence(_)));
    assert!(!registry.contains(DEFAULT_CATEGORIES[0]));
    assert_eq!(registry.current(), Some(DEFAULT_CATEGORIES[1]));
    assert_eq!(port.inner.get(CATEGORIES_KEY).unwrap(), None);
}

#[test]
fn registry_surfaces_failed_write_after_applying_select() {
    let port = FlakyPort::new();
    let mut registry = CategoryRegistry::load(&port).unwrap();

    port.broken.set(true);
    let err = registry.select(DEFAULT_CATEGORIES[3]).unwrap_err();

    assert!(matches!(err, RegistryError::Persistence(_)));
    assert_eq!(registry.current(), Some(DEFAULT_CATEGORIES[3]));
    assert_eq!(port.inner.get(SELECTED_CATEGORY_KEY).unwrap(), None);
}

#[test]
fn torn_label_and_selection_write_is_repaired_on_reload() {
    let port = FlakyPort::new();
    {
        let mut registry = CategoryRegistry::load(&port).unwrap();
        registry.select(DEFAULT_CATEGORIES[1]).unwrap();

        port.broken_key.set(Some(SELECTED_CATEGORY_KEY));
        assert!(registry.remove(DEFAULT_CATEGORIES[1]).is_err());
    }

    let durable_selection = port.inner.get(SELECTED_CATEGORY_KEY).unwrap().unwrap();
    assert!(durable_selection.contains(DEFAULT_CATEGORIES[1]));

    let reloaded = CategoryRegistry::load(&port).unwrap();
    assert!(!reloaded.contains(DEFAULT_CATEGORIES[1]));
    assert_eq!(reloaded.current(), Some(DEFAULT_CATEGORIES[0]));
}
