//! Tracker - application state owning the catalog and the weekly log
//!
//! All mutations go through here so each one is saved before the next
//! starts.

use chrono::NaiveDate;
use tracing::info;

use crate::catalog::MuscleCatalog;
use crate::charts::{self, ChartSeries};
use crate::db::codec::{SCHEMA_VERSION, WorkingSet, check_version};
use crate::db::{KeyValueStore, SCHEMA_VERSION_KEY};
use crate::error::{Result, ValidationError};
use crate::week::{WeekLabel, week_label_of};
use crate::weekly::WeeklyLogStore;

pub struct Tracker<S: KeyValueStore> {
    store: S,
    catalog: MuscleCatalog,
    log: WeeklyLogStore,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load state from the store, seeding the catalog on first run
    ///
    /// Stores older than the current schema get their legacy week keys
    /// imported first. A failed import fails the load, so nothing half
    /// migrated is kept in memory.
    pub fn load(mut store: S, seed: &[&str]) -> Result<Self> {
        let version = check_version(store.get(SCHEMA_VERSION_KEY)?.as_deref())?;

        let catalog = MuscleCatalog::load(&mut store, seed)?;
        let mut log = WeeklyLogStore::load(&store)?;

        if version < SCHEMA_VERSION {
            let migrated = log.import_legacy_weeks(&mut store)?;
            if migrated > 0 {
                info!("Migrated {} legacy week keys", migrated);
            }
        }

        Ok(Self { store, catalog, log })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn muscles(&self) -> &[String] {
        self.catalog.list()
    }

    pub fn log(&self) -> &WeeklyLogStore {
        &self.log
    }

    /// Add sets for a muscle in the week containing `date`
    pub fn add_sets(&mut self, date: NaiveDate, muscle: &str, delta: i64) -> Result<u32> {
        let week = week_label_of(date);
        self.log.upsert_sets(&week, muscle, delta, &self.catalog, &mut self.store)
    }

    /// Overwrite the count of an existing entry
    pub fn set_count(&mut self, date: NaiveDate, muscle: &str, sets: u32) -> Result<bool> {
        let week = week_label_of(date);
        self.log.set_count(&week, muscle, sets, &mut self.store)
    }

    pub fn remove_entry(&mut self, date: NaiveDate, muscle: &str) -> Result<bool> {
        let week = week_label_of(date);
        self.log.remove_entry(&week, muscle, &mut self.store)
    }

    pub fn replace_week(&mut self, week: &str, entries: Vec<WorkingSet>) -> Result<()> {
        self.log.replace_week(week, entries, &mut self.store)
    }

    pub fn entries_for(&self, week: &str) -> Vec<WorkingSet> {
        self.log.entries_for(week)
    }

    /// Whether new sets may be recorded for `muscle`
    ///
    /// Entries left behind for removed muscles are still shown but cannot
    /// be added to.
    pub fn is_selectable(&self, muscle: &str) -> bool {
        self.catalog.contains(muscle)
    }

    pub fn add_muscle(&mut self, name: &str) -> Result<String> {
        self.catalog.add_muscle(name, &mut self.store)
    }

    /// Remove a muscle from the catalog, then from every week
    ///
    /// Returns the number of log entries removed.
    pub fn remove_muscle(&mut self, name: &str) -> Result<usize> {
        if !self.catalog.remove_muscle(name, &mut self.store)? {
            return Err(ValidationError::UnknownMuscle(name.to_string()).into());
        }
        self.log.remove_muscle_everywhere(name, &mut self.store)
    }

    pub fn bar_series(&self, week: &str) -> ChartSeries {
        charts::bar_series_for_week(&self.log, week)
    }

    pub fn trend_series(&self, muscle: &str, token: &str, now: NaiveDate) -> ChartSeries {
        charts::trend_series_for_muscle(&self.log, muscle, token, now)
    }

    pub fn total_series(&self, token: &str, now: NaiveDate) -> ChartSeries {
        charts::total_series_for_range(&self.log, token, now)
    }

    /// Week label for a date, as used in the log
    pub fn week_of(&self, date: NaiveDate) -> WeekLabel {
        week_label_of(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DEFAULT_MUSCLES, EXTENDED_DEFAULTS};
    use crate::db::{CATALOG_KEY, MemoryStore, SqliteStore, WEEKLY_LOG_KEY};
    use crate::error::TrackerError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker() -> Tracker<MemoryStore> {
        Tracker::load(MemoryStore::new(), DEFAULT_MUSCLES).unwrap()
    }

    #[test]
    fn test_first_load_writes_catalog_and_version() {
        let t = tracker();
        assert_eq!(t.muscles(), &["Chest", "Back", "Shoulders"]);
        assert!(t.store().get(CATALOG_KEY).unwrap().is_some());
        assert_eq!(t.store().get(SCHEMA_VERSION_KEY).unwrap().as_deref(), Some("2"));
        assert_eq!(t.store().get(WEEKLY_LOG_KEY).unwrap(), None);
    }

    #[test]
    fn test_newer_schema_refused() {
        let mut store = MemoryStore::new();
        store.set(SCHEMA_VERSION_KEY, "7").unwrap();
        let err = Tracker::load(store, DEFAULT_MUSCLES).err().unwrap();
        assert!(matches!(err, TrackerError::Codec(_)));
    }

    #[test]
    fn test_add_sets_same_week_merges() {
        let mut t = tracker();
        // Monday and the following Sunday
        t.add_sets(date(2026, 10, 19), "Chest", 3).unwrap();
        t.add_sets(date(2026, 10, 25), "Chest", 2).unwrap();

        let week = t.week_of(date(2026, 10, 21));
        assert_eq!(t.entries_for(&week), vec![WorkingSet::new("Chest", 5)]);
    }

    #[test]
    fn test_remove_muscle_cascades() {
        let mut t = tracker();
        for day in [date(2026, 10, 5), date(2026, 10, 12), date(2026, 10, 19)] {
            t.add_sets(day, "Chest", 2).unwrap();
            t.add_sets(day, "Back", 3).unwrap();
        }

        assert_eq!(t.remove_muscle("Chest").unwrap(), 3);
        assert!(!t.is_selectable("Chest"));
        for day in [date(2026, 10, 5), date(2026, 10, 12), date(2026, 10, 19)] {
            assert_eq!(t.entries_for(&t.week_of(day)), vec![WorkingSet::new("Back", 3)]);
        }

        let err = t.add_sets(date(2026, 10, 19), "Chest", 1).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::UnknownMuscle(_))));
    }

    #[test]
    fn test_remove_unknown_muscle() {
        let mut t = tracker();
        let err = t.remove_muscle("Neck").unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::UnknownMuscle(_))));
    }

    #[test]
    fn test_state_survives_reload() {
        let mut t = tracker();
        t.add_muscle("Calves").unwrap();
        t.add_sets(date(2026, 10, 20), "Calves", 4).unwrap();

        let store = t.store().clone();
        let reloaded = Tracker::load(store, DEFAULT_MUSCLES).unwrap();
        assert!(reloaded.is_selectable("Calves"));
        let week = reloaded.week_of(date(2026, 10, 20));
        assert_eq!(reloaded.bar_series(&week).labels, vec!["Calves"]);
    }

    #[test]
    fn test_dangling_entry_still_displayed() {
        // Catalog saved without Chest but the log cascade never happened
        let mut store = MemoryStore::new();
        store.set(CATALOG_KEY, r#"[{"muscle":"Back","sets":0}]"#).unwrap();
        store
            .set(WEEKLY_LOG_KEY, r#"{"Oct 19, 2026":[{"muscle":"Chest","sets":4}]}"#)
            .unwrap();

        let t = Tracker::load(store, DEFAULT_MUSCLES).unwrap();
        assert!(!t.is_selectable("Chest"));
        assert_eq!(t.bar_series("Oct 19, 2026").values, vec![4.0]);
        let trend = t.trend_series("Chest", "1_month", date(2026, 10, 26));
        assert_eq!(trend.values.last(), Some(&4.0));
    }

    #[test]
    fn test_legacy_keys_migrated_on_load() {
        let mut store = MemoryStore::new();
        store.set("Oct 12, 2026", r#"[{"muscle":"Chest","sets":6}]"#).unwrap();

        let t = Tracker::load(store, DEFAULT_MUSCLES).unwrap();
        assert_eq!(t.entries_for("Oct 12, 2026"), vec![WorkingSet::new("Chest", 6)]);
        assert_eq!(t.store().get("Oct 12, 2026").unwrap(), None);
    }

    #[test]
    fn test_sqlite_backed_tracker() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut t = Tracker::load(store, EXTENDED_DEFAULTS).unwrap();
        assert_eq!(t.muscles().len(), EXTENDED_DEFAULTS.len());

        t.add_sets(date(2026, 10, 19), "Quads", 5).unwrap();
        assert!(t.set_count(date(2026, 10, 19), "Quads", 2).unwrap());
        let totals = t.total_series("1_month", date(2026, 10, 26));
        assert_eq!(totals.values.last(), Some(&2.0));

        assert!(t.remove_entry(date(2026, 10, 19), "Quads").unwrap());
        assert!(t.log().log().is_empty());
    }

    #[test]
    fn test_failed_persistence_is_reported() {
        let mut t = tracker();
        t.store.set_fail_writes(true);

        let err = t.add_sets(date(2026, 10, 19), "Chest", 2).unwrap_err();
        assert!(err.is_persistence());
        // Not rolled back
        assert_eq!(t.entries_for(&t.week_of(date(2026, 10, 19))), vec![WorkingSet::new("Chest", 2)]);
    }

    fn legacy_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(CATALOG_KEY, r#"[{"muscle":"Chest","sets":0}]"#).unwrap();
        store.set(SCHEMA_VERSION_KEY, "1").unwrap();
        store.set("Oct 12, 2026", r#"[{"muscle":"Chest","sets":6}]"#).unwrap();
        store
    }

    #[test]
    fn test_failed_migration_does_not_double_legacy_sets() {
        let mut store = legacy_store();
        store.set_fail_writes(true);
        let err = Tracker::load(store.clone(), DEFAULT_MUSCLES).err().unwrap();
        assert!(err.is_persistence());

        store.set_fail_writes(false);
        let mut t = Tracker::load(store, DEFAULT_MUSCLES).unwrap();
        assert_eq!(t.entries_for("Oct 12, 2026"), vec![WorkingSet::new("Chest", 6)]);
        t.add_sets(date(2026, 10, 13), "Chest", 1).unwrap();

        let reloaded = Tracker::load(t.store().clone(), DEFAULT_MUSCLES).unwrap();
        assert_eq!(reloaded.entries_for("Oct 12, 2026"), vec![WorkingSet::new("Chest", 7)]);
    }

    #[test]
    fn test_leftover_legacy_key_not_imported_twice() {
        let mut store = legacy_store();
        store.set_fail_removes(true);
        let t = Tracker::load(store, DEFAULT_MUSCLES).unwrap();
        assert_eq!(t.entries_for("Oct 12, 2026"), vec![WorkingSet::new("Chest", 6)]);
        assert!(t.store().get("Oct 12, 2026").unwrap().is_some());
        assert_eq!(t.store().get(SCHEMA_VERSION_KEY).unwrap().as_deref(), Some("2"));

        let mut store = t.store().clone();
        store.set_fail_removes(false);
        let reloaded = Tracker::load(store, DEFAULT_MUSCLES).unwrap();
        assert_eq!(reloaded.entries_for("Oct 12, 2026"), vec![WorkingSet::new("Chest", 6)]);
    }

    #[test]
    fn test_set_count_zero_rejected() {
        let mut t = tracker();
        t.add_sets(date(2026, 10, 19), "Chest", 3).unwrap();
        let err = t.set_count(date(2026, 10, 19), "Chest", 0).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::NonPositiveSets(0))));
        assert_eq!(t.log().sets_for(&t.week_of(date(2026, 10, 19)), "Chest"), 3);
    }
}
