//! Fixed-capacity slot table with generational validity
//!
//! A slot is `occupied` from allocation until its object is freed. The object
//! itself may be temporarily checked out while it runs its own hooks; the slot
//! stays occupied, so the object's handle keeps passing validity checks.

use std::mem;

use super::{GameObject, GameObjectHandle};

#[derive(Default)]
struct Slot {
    object: Option<Box<GameObject>>,
    occupied: bool,
    generation: u32,
}

/// Slot storage plus the free stack and the pending destroy queue
#[derive(Default)]
pub(crate) struct SlotTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    to_be_destroyed: Vec<u32>,
}

impl SlotTable {
    /// Table with `capacity` empty slots; index 0 is handed out first
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            slots: (0..capacity).map(|_| Slot::default()).collect(),
            free: (0..capacity).rev().collect(),
            to_be_destroyed: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn capacity(&self) -> u32 {
        // Slots are only ever created from a u32 capacity
        self.slots.len() as u32
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.occupied).count()
    }

    pub fn pending_destroy_count(&self) -> usize {
        self.to_be_destroyed.len()
    }

    fn slot(&self, index: u32) -> Option<&Slot> {
        self.slots.get(index as usize)
    }

    fn slot_mut(&mut self, index: u32) -> Option<&mut Slot> {
        self.slots.get_mut(index as usize)
    }

    /// Current generation of the slot at `index`
    pub fn generation(&self, index: u32) -> Option<u32> {
        self.slot(index).map(|slot| slot.generation)
    }

    pub fn is_valid(&self, handle: GameObjectHandle) -> bool {
        self.slot(handle.index())
            .is_some_and(|slot| slot.occupied && slot.generation == handle.generation())
    }

    /// Reserve a free slot; the object is stored later with [`place`](Self::place)
    pub fn allocate(&mut self) -> Option<GameObjectHandle> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.occupied = true;
        Some(GameObjectHandle::new(index, slot.generation))
    }

    /// Return a slot reserved by `allocate` whose object was never placed
    pub fn release_unplaced(&mut self, handle: GameObjectHandle) {
        if let Some(slot) = self.slot_mut(handle.index()) {
            if slot.occupied && slot.object.is_none() {
                slot.occupied = false;
                self.free.push(handle.index());
            }
        }
    }

    pub fn place(&mut self, handle: GameObjectHandle, object: Box<GameObject>) {
        if let Some(slot) = self.slot_mut(handle.index()) {
            slot.object = Some(object);
        }
    }

    pub fn get(&self, handle: GameObjectHandle) -> Option<&GameObject> {
        if !self.is_valid(handle) {
            return None;
        }
        self.slot(handle.index())?.object.as_deref()
    }

    pub fn get_mut(&mut self, handle: GameObjectHandle) -> Option<&mut GameObject> {
        if !self.is_valid(handle) {
            return None;
        }
        self.slot_mut(handle.index())?.object.as_deref_mut()
    }

    /// Take a live object out of its slot, leaving the slot occupied
    pub fn check_out(&mut self, handle: GameObjectHandle) -> Option<Box<GameObject>> {
        if !self.is_valid(handle) {
            return None;
        }
        self.slot_mut(handle.index())?.object.take()
    }

    /// Take whatever object sits at `index`, valid handle or not
    ///
    /// Used by the frame loop: an object destroyed this frame still updates.
    pub fn check_out_index(&mut self, index: u32) -> Option<Box<GameObject>> {
        let slot = self.slot_mut(index)?;
        if slot.occupied {
            slot.object.take()
        } else {
            None
        }
    }

    /// Put a checked-out object back; hands it back if its slot is gone
    pub fn check_in(&mut self, index: u32, object: Box<GameObject>) -> Option<Box<GameObject>> {
        match self.slot_mut(index) {
            Some(slot) if slot.occupied && slot.object.is_none() => {
                slot.object = Some(object);
                None
            }
            _ => Some(object),
        }
    }

    /// Invalidate `handle` now and queue its slot for the next flush
    ///
    /// Returns `false` for stale handles, which are ignored.
    pub fn mark_destroyed(&mut self, handle: GameObjectHandle) -> bool {
        if !self.is_valid(handle) {
            return false;
        }
        let index = handle.index();
        if let Some(slot) = self.slot_mut(index) {
            slot.generation = slot.generation.wrapping_add(1);
        }
        self.to_be_destroyed.push(index);
        true
    }

    pub fn take_destroy_list(&mut self) -> Vec<u32> {
        mem::take(&mut self.to_be_destroyed)
    }

    /// Remove the object at `index` and return the slot to the free stack
    pub fn free(&mut self, index: u32) -> Option<Box<GameObject>> {
        let slot = self.slot_mut(index)?;
        if !slot.occupied {
            return None;
        }
        let object = slot.object.take();
        slot.occupied = false;
        self.free.push(index);
        object
    }

    /// Drop a live object that never got going and return its slot
    ///
    /// The generation still moves on, so anything that saw the handle while
    /// the object was initializing reads it as stale.
    pub fn discard(&mut self, handle: GameObjectHandle) -> Option<Box<GameObject>> {
        if !self.is_valid(handle) {
            return None;
        }
        let object = self.evict(handle.index());
        self.free.push(handle.index());
        object
    }

    /// Remove the object at `index` for teardown, invalidating its handles
    pub fn evict(&mut self, index: u32) -> Option<Box<GameObject>> {
        let slot = self.slot_mut(index)?;
        if !slot.occupied {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.occupied = false;
        slot.object.take()
    }

    /// Live objects with their handles, in slot order
    ///
    /// Objects already destroyed this frame (stale handle) are skipped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (GameObjectHandle, &GameObject)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let object = slot.object.as_deref()?;
            let handle = GameObjectHandle::new(index as u32, slot.generation);
            (slot.occupied && object.handle() == handle).then_some((handle, object))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.slots.iter_mut().filter_map(|slot| {
            if slot.occupied {
                slot.object.as_deref_mut()
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocate_and_place(table: &mut SlotTable, name: &str) -> GameObjectHandle {
        let handle = table.allocate().unwrap();
        table.place(handle, Box::new(GameObject::new(name, handle)));
        handle
    }

    #[test]
    fn test_first_allocation_uses_slot_zero() {
        let mut table = SlotTable::with_capacity(3);
        let handle = table.allocate().unwrap();
        assert_eq!((handle.index(), handle.generation()), (0, 0));
        assert_eq!(table.allocate().unwrap().index(), 1);
    }

    #[test]
    fn test_capacity_is_fixed() {
        let mut table = SlotTable::with_capacity(1);
        assert!(table.allocate().is_some());
        assert!(table.allocate().is_none());
        assert_eq!(table.capacity(), 1);
    }

    #[test]
    fn test_destroy_invalidates_before_free() {
        let mut table = SlotTable::with_capacity(2);
        let handle = allocate_and_place(&mut table, "A");

        assert!(table.mark_destroyed(handle));
        assert!(!table.is_valid(handle));
        assert!(table.get(handle).is_none());
        // Still stored until the flush frees it
        assert_eq!(table.live_count(), 1);
        assert!(!table.mark_destroyed(handle));
        assert_eq!(table.pending_destroy_count(), 1);

        for index in table.take_destroy_list() {
            assert!(table.free(index).is_some());
        }
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn test_most_recently_freed_slot_is_reused() {
        let mut table = SlotTable::with_capacity(3);
        let a = allocate_and_place(&mut table, "A");
        let b = allocate_and_place(&mut table, "B");
        table.mark_destroyed(b);
        table.mark_destroyed(a);
        for index in table.take_destroy_list() {
            table.free(index);
        }

        let reused = table.allocate().unwrap();
        assert_eq!(reused.index(), a.index());
        assert_eq!(reused.generation(), a.generation() + 1);
    }

    #[test]
    fn test_checked_out_object_keeps_valid_handle() {
        let mut table = SlotTable::with_capacity(1);
        let handle = allocate_and_place(&mut table, "A");

        let object = table.check_out(handle).unwrap();
        assert!(table.is_valid(handle));
        assert!(table.get(handle).is_none());
        assert!(table.check_in(handle.index(), object).is_none());
        assert_eq!(table.get(handle).map(GameObject::name), Some("A"));
    }

    #[test]
    fn test_check_in_to_missing_slot_hands_object_back() {
        let mut table = SlotTable::with_capacity(1);
        let handle = allocate_and_place(&mut table, "A");
        let object = table.check_out(handle).unwrap();

        table = SlotTable::default();
        assert!(table.check_in(handle.index(), object).is_some());
    }

    #[test]
    fn test_release_unplaced_returns_slot() {
        let mut table = SlotTable::with_capacity(1);
        let handle = table.allocate().unwrap();
        table.release_unplaced(handle);
        assert!(!table.is_valid(handle));
        assert_eq!(table.allocate(), Some(handle));
    }

    #[test]
    fn test_discard_frees_slot_with_new_generation() {
        let mut table = SlotTable::with_capacity(1);
        let handle = allocate_and_place(&mut table, "A");

        assert_eq!(table.discard(handle).map(|object| object.name().to_owned()), Some("A".to_owned()));
        assert!(!table.is_valid(handle));
        assert!(table.discard(handle).is_none());

        let reused = table.allocate().unwrap();
        assert_eq!((reused.index(), reused.generation()), (0, 1));
    }

    #[test]
    fn test_iter_skips_destroyed_objects() {
        let mut table = SlotTable::with_capacity(3);
        let a = allocate_and_place(&mut table, "A");
        let b = allocate_and_place(&mut table, "B");
        table.mark_destroyed(a);

        let names: Vec<_> = table.iter().map(|(handle, object)| (handle, object.name())).collect();
        assert_eq!(names, vec![(b, "B")]);
    }
}
