//! Persistence seam for generated slots.
//!
//! The engine never touches a store itself; callers clear, generate and save
//! in sequence (see [`crate::service`]).

use serde::Deserialize;
use std::collections::HashSet;

use crate::data::{Batch, SessionType, TimetableSlot, Year};
use crate::error::StoreError;
use crate::grid;

/// Optional constraints on a slot read. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFilter {
    pub year: Option<Year>,
    pub semester: Option<u32>,
    pub batch: Option<Batch>,
    pub faculty: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<SessionType>,
}

impl SlotFilter {
    pub fn matches(&self, slot: &TimetableSlot) -> bool {
        self.year.is_none_or(|y| slot.year == y)
            && self.semester.is_none_or(|s| slot.semester == s)
            && self.batch.is_none_or(|b| slot.batch == Some(b))
            && self.faculty.as_ref().is_none_or(|f| &slot.faculty == f)
            && self.kind.is_none_or(|k| slot.kind == k)
    }
}

pub trait SlotStore {
    /// Removes every stored slot, returning how many were dropped.
    fn clear_all(&mut self) -> usize;

    /// Removes the slots of one year and semester.
    fn clear_scope(&mut self, year: Year, semester: u32) -> usize;

    /// Stores all of `slots` or none of them.
    fn batch_save(&mut self, slots: &[TimetableSlot]) -> Result<usize, StoreError>;

    /// Matching slots in (day, time) order.
    fn find(&self, filter: &SlotFilter) -> Vec<TimetableSlot>;
}

#[derive(Debug, Default)]
pub struct InMemorySlotStore {
    slots: Vec<TimetableSlot>,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SlotStore for InMemorySlotStore {
    fn clear_all(&mut self) -> usize {
        let cleared = self.slots.len();
        self.slots.clear();
        cleared
    }

    fn clear_scope(&mut self, year: Year, semester: u32) -> usize {
        let before = self.slots.len();
        self.slots
            .retain(|s| !(s.year == year && s.semester == semester));
        before - self.slots.len()
    }

    fn batch_save(&mut self, slots: &[TimetableSlot]) -> Result<usize, StoreError> {
        let mut ids: HashSet<&str> = self.slots.iter().map(|s| s.id.as_str()).collect();
        for slot in slots {
            if !ids.insert(slot.id.as_str()) {
                return Err(StoreError::DuplicateSlot(slot.id.clone()));
            }
        }
        self.slots.extend_from_slice(slots);
        Ok(slots.len())
    }

    fn find(&self, filter: &SlotFilter) -> Vec<TimetableSlot> {
        let mut found: Vec<_> = self
            .slots
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        // slots outside the canonical grid go last within their day
        found.sort_by_key(|s| (s.day, grid::slot_ordinal(&s.time).unwrap_or(usize::MAX)));
        found
    }
}
