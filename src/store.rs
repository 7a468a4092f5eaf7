// Session-scoped in-memory record store

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::filter::FilterSet;
use crate::page::{Page, paginate, total_pages};
use crate::record::Record;

/// Direction for moving a record within store order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Ordered, in-memory collection of records plus per-session side-state
///
/// Holds favorites, the comparison selection and the page cursor. One store
/// belongs to one session; it is never shared.
#[derive(Debug, Clone)]
pub struct Store<R: Record> {
    records: Vec<R>,
    baseline: Vec<R>,
    favorites: BTreeSet<u64>,
    selection: Vec<u64>,
    page: usize,
    /// Highest id handed out so far; ids are not reused after deletion
    high_water: u64,
    config: StoreConfig,
}

impl<R: Record> Store<R> {
    /// Create a store seeded with a copy of `baseline`
    pub fn new(baseline: Vec<R>, config: StoreConfig) -> Self {
        let mut store = Self {
            records: Vec::new(),
            baseline,
            favorites: BTreeSet::new(),
            selection: Vec::new(),
            page: 1,
            high_water: 0,
            config,
        };
        store.reset();
        store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn baseline(&self) -> &[R] {
        &self.baseline
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn position(&self, id: u64) -> StoreResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound {
                collection: R::collection_name(),
                id,
            })
    }

    /// Id the next `add` will assign
    pub fn next_id(&self) -> u64 {
        let max_existing = self.records.iter().map(|r| r.id()).max().unwrap_or(0);
        self.high_water.max(max_existing) + 1
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a record built from `draft`; never fails
    pub fn add(&mut self, draft: R::Draft) -> &R {
        let id = self.next_id();
        let record = R::from_draft(id, draft, self.records.last(), &self.config);
        self.high_water = id;
        debug!(collection = R::collection_name(), id, "add: appended record");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Replace every field of a record, keeping its id and position
    pub fn update(&mut self, id: u64, draft: R::Draft) -> StoreResult<&R> {
        let index = self.position(id)?;
        self.records[index] = R::from_draft(id, draft, None, &self.config);
        debug!(collection = R::collection_name(), id, "update: replaced record");
        Ok(&self.records[index])
    }

    /// Remove a record and drop it from favorites and selection
    pub fn remove(&mut self, id: u64) -> StoreResult<R> {
        let index = self.position(id)?;
        let record = self.records.remove(index);
        self.favorites.remove(&id);
        self.selection.retain(|s| *s != id);
        debug!(collection = R::collection_name(), id, "remove: deleted record");
        Ok(record)
    }

    /// Restore the baseline and clear all side-state
    pub fn reset(&mut self) {
        let records = self.baseline.clone();
        self.replace_all(records);
        info!(
            collection = R::collection_name(),
            count = self.records.len(),
            "Store reset to baseline"
        );
    }

    /// Swap in a new baseline, then reset to it
    pub fn reset_to(&mut self, baseline: Vec<R>) {
        self.baseline = baseline;
        self.reset();
    }

    /// Replace the collection (e.g. after an import) and clear all side-state
    pub fn replace_all(&mut self, records: Vec<R>) {
        self.high_water = records.iter().map(|r| r.id()).max().unwrap_or(0);
        self.records = records;
        self.favorites.clear();
        self.selection.clear();
        self.page = 1;
    }

    /// Swap the record at `index` with its neighbor; returns false at a boundary
    pub fn reorder(&mut self, index: usize, direction: Direction) -> bool {
        if index >= self.records.len() {
            return false;
        }
        let other = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.records.len() => index + 1,
            _ => return false,
        };
        self.records.swap(index, other);
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Records matching every constraint, in store order
    pub fn filter(&self, filters: &FilterSet) -> Vec<&R> {
        self.records.iter().filter(|r| filters.matches(*r)).collect()
    }

    /// Distinct, sorted values of a field; the "everything selected" set for a categorical filter
    pub fn distinct(&self, field: &str) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.field(field))
            .map(|v| v.to_string())
            .collect()
    }

    /// Filter, clamp the page cursor, and return the current page
    pub fn view(&mut self, filters: &FilterSet) -> Page<&R> {
        let size = self.config.page_size;
        let matched = self.records.iter().filter(|r| filters.matches(*r)).count();
        self.page = self.page.clamp(1, total_pages(matched, size));
        paginate(self.filter(filters), size, self.page)
    }

    // ========================================================================
    // Page cursor
    // ========================================================================

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Advance unless already on the last page
    pub fn next_page(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    /// Go back unless already on the first page
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    // ========================================================================
    // Favorites and comparison selection
    // ========================================================================

    /// Flip favorite status; returns whether the record is now a favorite
    pub fn toggle_favorite(&mut self, id: u64) -> StoreResult<bool> {
        self.position(id)?;
        if self.favorites.remove(&id) {
            Ok(false)
        } else {
            self.favorites.insert(id);
            Ok(true)
        }
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(&id)
    }

    /// Favorite records, in store order
    pub fn favorites(&self) -> Vec<&R> {
        self.records
            .iter()
            .filter(|r| self.favorites.contains(&r.id()))
            .collect()
    }

    /// Add to the comparison selection; returns false once the cap is reached
    pub fn select(&mut self, id: u64) -> StoreResult<bool> {
        self.position(id)?;
        if self.selection.contains(&id) {
            return Ok(true);
        }
        if self.selection.len() >= self.config.compare_limit {
            debug!(id, limit = self.config.compare_limit, "select: selection full");
            return Ok(false);
        }
        self.selection.push(id);
        Ok(true)
    }

    pub fn deselect(&mut self, id: u64) {
        self.selection.retain(|s| *s != id);
    }

    /// Selected records, in selection order
    pub fn selection(&self) -> Vec<&R> {
        self.selection.iter().filter_map(|id| self.get(*id)).collect()
    }
}
