//! Editing lifecycle - Reversible per-row edit sessions over an id-keyed list.
//!
//! [`UndoBuffer`] keeps a copy of each row taken when editing starts and puts
//! it back on cancel. [`EditableList`] owns the live, ordered rows of one page
//! together with their buffer and exposes the edit operations by row id.

use crate::entities::{IngredientExtended, IngredientUsageExtended};
use std::collections::HashMap;
use tracing::debug;

/// A row that can be put into edit mode.
pub trait Editable {
    /// Identifier the row is looked up by
    fn id(&self) -> i64;
    /// Whether the row is in edit mode
    fn is_editing(&self) -> bool;
    /// Enters or leaves edit mode
    fn set_editing(&mut self, editing: bool);
}

impl Editable for IngredientUsageExtended {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }
}

impl Editable for IngredientExtended {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }
}

/// Row snapshots taken at edit start, keyed by row id.
#[derive(Debug, Clone)]
pub struct UndoBuffer<T> {
    saved: HashMap<i64, T>,
}

impl<T> Default for UndoBuffer<T> {
    fn default() -> Self {
        Self {
            saved: HashMap::new(),
        }
    }
}

impl<T: Editable + Clone> UndoBuffer<T> {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the row's current values, replacing any earlier snapshot for the
    /// same id, and puts the row into edit mode.
    pub fn start(&mut self, row: &mut T) {
        self.saved.insert(row.id(), row.clone());
        row.set_editing(true);
    }

    /// Restores the saved values if a snapshot exists and drops it. The row
    /// always leaves edit mode, snapshot or not.
    pub fn cancel(&mut self, row: &mut T) {
        if let Some(saved) = self.saved.remove(&row.id()) {
            *row = saved;
        }
        row.set_editing(false);
    }

    /// Keeps the row's edited values, drops its snapshot and leaves edit mode.
    pub fn finish(&mut self, row: &mut T) {
        self.saved.remove(&row.id());
        row.set_editing(false);
    }

    /// Drops the snapshot for `id` without touching any row.
    pub fn discard(&mut self, id: i64) -> Option<T> {
        self.saved.remove(&id)
    }

    /// The snapshot held for `id`.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&T> {
        self.saved.get(&id)
    }

    /// Number of rows with a pending snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    /// Whether no snapshot is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

/// The live rows of a page plus their undo buffer.
#[derive(Debug, Clone)]
pub struct EditableList<T> {
    rows: Vec<T>,
    backup: UndoBuffer<T>,
}

impl<T> Default for EditableList<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            backup: UndoBuffer::default(),
        }
    }
}

impl<T: Editable + Clone> EditableList<T> {
    /// Wraps already enriched rows, keeping their order.
    #[must_use]
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            backup: UndoBuffer::new(),
        }
    }

    /// Appends a row at the end. Ids are not deduplicated.
    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// First row with `id`.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// First row with `id`, mutably.
    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    /// Row at `index` in display order.
    #[must_use]
    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    /// Position of the first row with `id`.
    #[must_use]
    pub fn position(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    /// Snapshots the first row with `id` and puts it into edit mode.
    ///
    /// Returns the row so the caller can edit it, or None if no row has `id`.
    pub fn start_editing(&mut self, id: i64) -> Option<&mut T> {
        let index = self.position(id)?;
        self.start_editing_at(index)
    }

    /// Snapshots the row at `index` and puts it into edit mode.
    ///
    /// Snapshots are keyed by row id, so rows sharing an id share one
    /// snapshot and the latest start wins.
    pub fn start_editing_at(&mut self, index: usize) -> Option<&mut T> {
        let row = self.rows.get_mut(index)?;
        self.backup.start(row);
        debug!("Started editing row {} at {}", row.id(), index);
        Some(row)
    }

    /// Restores the first row with `id` from its snapshot, if one exists,
    /// and leaves edit mode. Returns false if no row has `id`.
    pub fn cancel_editing(&mut self, id: i64) -> bool {
        self.position(id).is_some_and(|index| self.cancel_editing_at(index))
    }

    /// Restores the row at `index` from its snapshot, if one exists, and
    /// leaves edit mode. Returns false if `index` is out of range.
    pub fn cancel_editing_at(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        self.backup.cancel(row);
        debug!("Cancelled editing row {} at {}", row.id(), index);
        true
    }

    /// Accepts the edited values of the first row with `id`, discarding its
    /// snapshot. Returns false if no row has `id`.
    pub fn finish_editing(&mut self, id: i64) -> bool {
        self.position(id).is_some_and(|index| self.finish_editing_at(index))
    }

    /// Accepts the edited values of the row at `index`, discarding its
    /// snapshot. Returns false if `index` is out of range.
    pub fn finish_editing_at(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        self.backup.finish(row);
        debug!("Finished editing row {} at {}", row.id(), index);
        true
    }

    /// Removes the first row with `id`, keeping the order of the others.
    /// An unknown id leaves the list untouched.
    pub fn remove_item(&mut self, id: i64) -> Option<T> {
        let index = self.position(id)?;
        self.remove_at(index)
    }

    /// Removes the row at `index`, keeping the order of the others.
    ///
    /// The row's snapshot is dropped unless another row with the same id is
    /// still in edit mode, so a later row reusing the id never restores the
    /// removed row's values.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(index);
        let id = removed.id();
        if !self.rows.iter().any(|row| row.id() == id && row.is_editing()) {
            self.backup.discard(id);
        }
        debug!("Removed row {} at {}", id, index);
        Some(removed)
    }

    /// Rows in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The undo buffer.
    #[must_use]
    pub const fn backup(&self) -> &UndoBuffer<T> {
        &self.backup
    }
}

impl<'a, T> IntoIterator for &'a EditableList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
