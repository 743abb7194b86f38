//! Weekly log store - per-week working sets for each muscle group

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::catalog::MuscleCatalog;
use crate::db::codec::{
    WeeklyLog, WorkingSet, decode_week_entries, decode_weekly_log, encode_version, encode_weekly_log,
};
use crate::db::{KeyValueStore, SCHEMA_VERSION_KEY, WEEKLY_LOG_KEY};
use crate::error::{Result, ValidationError};
use crate::week::{parse_week_label, week_label_of};

/// Owns the week label -> entries mapping and saves it after each change
#[derive(Debug, Clone, Default)]
pub struct WeeklyLogStore {
    log: WeeklyLog,
}

impl WeeklyLogStore {
    pub fn from_log(log: WeeklyLog) -> Self {
        let log = log
            .into_iter()
            .map(|(week, entries)| (week, merge_duplicates(entries)))
            .filter(|(_, entries)| !entries.is_empty())
            .collect();
        Self { log }
    }

    /// Load the consolidated log; a missing key is an empty log
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        match store.get(WEEKLY_LOG_KEY)? {
            Some(raw) => {
                let log = Self::from_log(decode_weekly_log(&raw)?);
                info!("Loaded working sets for {} weeks", log.log.len());
                Ok(log)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn log(&self) -> &WeeklyLog {
        &self.log
    }

    /// Stored week labels
    pub fn weeks(&self) -> impl Iterator<Item = &str> {
        self.log.keys().map(String::as_str)
    }

    /// Entries for a week; empty when nothing was recorded
    pub fn entries_for(&self, week: &str) -> Vec<WorkingSet> {
        self.log.get(week).cloned().unwrap_or_default()
    }

    /// Sets recorded for one muscle in one week, 0 when absent
    pub fn sets_for(&self, week: &str, muscle: &str) -> u32 {
        self.log
            .get(week)
            .and_then(|entries| entries.iter().find(|e| e.muscle == muscle))
            .map(|e| e.sets)
            .unwrap_or(0)
    }

    /// Add `delta` sets for a muscle, merging into an existing entry
    pub fn upsert_sets<S: KeyValueStore>(
        &mut self,
        week: &str,
        muscle: &str,
        delta: i64,
        catalog: &MuscleCatalog,
        store: &mut S,
    ) -> Result<u32> {
        if muscle.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !catalog.contains(muscle) {
            return Err(ValidationError::UnknownMuscle(muscle.to_string()).into());
        }
        if delta <= 0 {
            return Err(ValidationError::NonPositiveSets(delta).into());
        }
        let delta = u32::try_from(delta).unwrap_or(u32::MAX);

        let entries = self.log.entry(week.to_string()).or_default();
        let total = match entries.iter_mut().find(|e| e.muscle == muscle) {
            Some(entry) => {
                entry.sets = entry.sets.saturating_add(delta);
                debug!("Merged {} sets into {} for {}", delta, muscle, week);
                entry.sets
            }
            None => {
                entries.push(WorkingSet::new(muscle, delta));
                delta
            }
        };

        self.save(store)?;
        Ok(total)
    }

    /// Overwrite a week's entries; an empty list clears the week
    pub fn replace_week<S: KeyValueStore>(
        &mut self,
        week: &str,
        entries: Vec<WorkingSet>,
        store: &mut S,
    ) -> Result<()> {
        let entries = merge_duplicates(entries);
        if entries.is_empty() {
            self.log.remove(week);
        } else {
            self.log.insert(week.to_string(), entries);
        }
        self.save(store)
    }

    /// Set the count of an existing entry in place
    ///
    /// Zero is rejected; use `remove_entry` to drop an entry. Returns
    /// `false` when the week has no entry for `muscle`.
    pub fn set_count<S: KeyValueStore>(
        &mut self,
        week: &str,
        muscle: &str,
        sets: u32,
        store: &mut S,
    ) -> Result<bool> {
        if sets == 0 {
            return Err(ValidationError::NonPositiveSets(0).into());
        }
        let mut entries = self.entries_for(week);
        match entries.iter_mut().find(|e| e.muscle == muscle) {
            Some(entry) => entry.sets = sets,
            None => return Ok(false),
        }
        self.replace_week(week, entries, store)?;
        Ok(true)
    }

    /// Delete one muscle's entry from a week
    pub fn remove_entry<S: KeyValueStore>(&mut self, week: &str, muscle: &str, store: &mut S) -> Result<bool> {
        let mut entries = self.entries_for(week);
        let before = entries.len();
        entries.retain(|e| e.muscle != muscle);
        if entries.len() == before {
            return Ok(false);
        }
        self.replace_week(week, entries, store)?;
        Ok(true)
    }

    /// Drop a muscle from every week; returns how many entries were removed
    pub fn remove_muscle_everywhere<S: KeyValueStore>(&mut self, muscle: &str, store: &mut S) -> Result<usize> {
        let mut removed = 0;
        for entries in self.log.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.muscle != muscle);
            removed += before - entries.len();
        }
        self.log.retain(|_, entries| !entries.is_empty());

        self.save(store)?;
        info!("Removed {} entries for {} across all weeks", removed, muscle);
        Ok(removed)
    }

    /// Fold legacy per-week keys into the consolidated log
    ///
    /// Counts are merged per muscle under the canonical week label. Once the
    /// consolidated log is saved the schema version is bumped, so the import
    /// never runs twice; only then are the legacy keys removed. A key that
    /// fails to be removed is left behind and ignored from then on.
    /// Returns the number of weeks imported.
    pub fn import_legacy_weeks<S: KeyValueStore>(&mut self, store: &mut S) -> Result<usize> {
        let legacy: Vec<(String, NaiveDate)> = store
            .keys()?
            .into_iter()
            .filter_map(|k| parse_week_label(&k).map(|monday| (k, monday)))
            .collect();

        let mut imported = Vec::new();
        for (key, monday) in legacy {
            let Some(raw) = store.get(&key)? else { continue };
            let entries = match decode_week_entries(&key, &raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping legacy week {}: {}", key, e);
                    continue;
                }
            };

            let week = self.log.entry(week_label_of(monday)).or_default();
            week.extend(entries);
            *week = merge_duplicates(std::mem::take(week));
            imported.push(key);
        }
        self.log.retain(|_, entries| !entries.is_empty());

        if !imported.is_empty() {
            self.save(store)?;
        }
        store.set(SCHEMA_VERSION_KEY, &encode_version()).map_err(|e| {
            error!("Error saving schema version: {}", e);
            e
        })?;

        for key in &imported {
            if let Err(e) = store.remove(key) {
                warn!("Could not remove legacy week {}: {}", key, e);
            }
        }
        if !imported.is_empty() {
            info!("Imported {} legacy weeks", imported.len());
        }
        Ok(imported.len())
    }

    fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        let raw = encode_weekly_log(&self.log)?;
        store.set(WEEKLY_LOG_KEY, &raw).map_err(|e| {
            error!("Error saving weekly log: {}", e);
            e
        })?;
        debug!("Saved weekly log ({} weeks)", self.log.len());
        Ok(())
    }
}

/// Collapse repeated muscles into one entry, keeping first-seen order
fn merge_duplicates(entries: Vec<WorkingSet>) -> Vec<WorkingSet> {
    let mut merged: Vec<WorkingSet> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.iter_mut().find(|e| e.muscle == entry.muscle) {
            Some(existing) => existing.sets = existing.sets.saturating_add(entry.sets),
            None => merged.push(entry),
        }
    }
    merged
}
