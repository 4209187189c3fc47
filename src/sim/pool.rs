//! Fixed-capacity entity pools
//!
//! Every pool is sized once when the game starts and never grows. An entity is
//! alive while its slot's active flag is set; clearing the flag hands the slot
//! back for reuse.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// An entity that can occupy a [`Pool`] slot
pub trait Slot: Default {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

/// Array of reusable slots with an active flag per slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Slot> Pool<T> {
    /// Create a pool with `capacity` inactive slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(T::default).take(capacity).collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the first inactive slot
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_active())
    }

    /// Claim the first inactive slot and mark it active.
    ///
    /// Returns `None` when every slot is in use; callers treat that as a no-op.
    pub fn allocate(&mut self) -> Option<usize> {
        let index = self.first_free()?;
        self.slots[index].set_active(true);
        Some(index)
    }

    /// Claim a slot and move `entity` into it
    pub fn spawn(&mut self, mut entity: T) -> Option<usize> {
        let index = self.allocate()?;
        entity.set_active(true);
        self.slots[index] = entity;
        Some(index)
    }

    /// Clear the active flag of a slot. Out-of-range indices are ignored.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.set_active(false);
        }
    }

    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.set_active(false);
        }
    }

    #[inline]
    pub fn has_free(&self) -> bool {
        self.first_free().is_some()
    }

    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_active()).count()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.slots.iter_mut()
    }

    /// Active slots with their indices, in index order
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_active())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }
}

impl<T> Index<usize> for Pool<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

impl<T> IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}
