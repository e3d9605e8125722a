//! # Seed History
//!
//! One seed per visited chain position plus a cursor.
//!
//! ## Branch Overwrite
//!
//! Moving forward from a position that already has a successor overwrites
//! exactly that one slot. Slots beyond it are kept but go stale: they can
//! only be reached by moving forward again, which overwrites each of them
//! first. Nothing is ever truncated or shifted.
//!
//! ```text
//! seeds:  [ s0 | s1 | s2 | s3 ]      cursor = 3
//! back:   [ s0 | s1 | s2 | s3 ]      cursor = 2
//! back:   [ s0 | s1 | s2 | s3 ]      cursor = 1
//! fwd(n): [ s0 | s1 | n  | s3 ]      cursor = 2   (s3 is now stale)
//! ```

use delve_procedural::RoomSeed;

/// Ordered seeds plus the current position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedHistory {
    seeds: Vec<RoomSeed>,
    /// `None` before the first room.
    current: Option<usize>,
}

impl SeedHistory {
    /// Creates an empty history in the idle position.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seeds: Vec::new(),
            current: None,
        }
    }

    /// Current position, or `None` before the first room.
    #[inline]
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Seed at the current position.
    #[must_use]
    pub fn current_seed(&self) -> Option<RoomSeed> {
        self.current.and_then(|index| self.seed_at(index))
    }

    /// Position the next forward move would land on.
    #[inline]
    #[must_use]
    pub const fn next_index(&self) -> usize {
        match self.current {
            Some(index) => index + 1,
            None => 0,
        }
    }

    /// Stored seed at `index`, stale slots included.
    #[must_use]
    pub fn seed_at(&self, index: usize) -> Option<RoomSeed> {
        self.seeds.get(index).copied()
    }

    /// Number of stored slots, stale slots included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Returns true if no room has been visited.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// All stored seeds in chain order.
    #[must_use]
    pub fn seeds(&self) -> &[RoomSeed] {
        &self.seeds
    }

    /// Moves forward, storing `seed` at the new position.
    ///
    /// Returns the new index and the seed it replaced, if the slot
    /// already existed.
    pub fn advance(&mut self, seed: RoomSeed) -> (usize, Option<RoomSeed>) {
        let index = self.next_index();
        let replaced = if let Some(slot) = self.seeds.get_mut(index) {
            Some(std::mem::replace(slot, seed))
        } else {
            self.seeds.push(seed);
            None
        };
        self.current = Some(index);
        (index, replaced)
    }

    /// Position and seed a back move would land on, without moving.
    #[must_use]
    pub fn previous(&self) -> Option<(usize, RoomSeed)> {
        let index = self.current.filter(|&i| i > 0)? - 1;
        Some((index, self.seed_at(index)?))
    }

    /// Moves back one position.
    ///
    /// Returns the new index and its stored seed, or `None` (no change)
    /// when at or before the first room.
    pub fn retreat(&mut self) -> Option<(usize, RoomSeed)> {
        let previous = self.previous()?;
        self.current = Some(previous.0);
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(value: i64) -> RoomSeed {
        RoomSeed::new(value).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let history = SeedHistory::new();
        assert_eq!(history.current_index(), None);
        assert_eq!(history.current_seed(), None);
        assert_eq!(history.next_index(), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn test_advance_appends() {
        let mut history = SeedHistory::new();
        assert_eq!(history.advance(seed(10)), (0, None));
        assert_eq!(history.advance(seed(11)), (1, None));
        assert_eq!(history.current_index(), Some(1));
        assert_eq!(history.current_seed(), Some(seed(11)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_retreat_stops_at_first_room() {
        let mut history = SeedHistory::new();
        assert_eq!(history.retreat(), None, "idle cannot go back");

        history.advance(seed(1));
        assert_eq!(history.retreat(), None);
        assert_eq!(history.current_index(), Some(0));

        history.advance(seed(2));
        assert_eq!(history.retreat(), Some((0, seed(1))));
        assert_eq!(history.retreat(), None);
    }

    #[test]
    fn test_forward_after_back_overwrites_one_slot() {
        let mut history = SeedHistory::new();
        for value in [10, 11, 12, 13] {
            history.advance(seed(value));
        }
        history.retreat();
        history.retreat();
        assert_eq!(history.current_index(), Some(1));

        assert_eq!(history.advance(seed(99)), (2, Some(seed(12))));
        assert_eq!(history.seeds(), &[seed(10), seed(11), seed(99), seed(13)]);
        assert_eq!(history.len(), 4, "trailing slot is stale, not removed");

        // Forward again overwrites the stale slot before it can be read
        assert_eq!(history.advance(seed(77)), (3, Some(seed(13))));
        assert_eq!(history.current_seed(), Some(seed(77)));
    }

    #[test]
    fn test_revisit_reads_stored_seed() {
        let mut history = SeedHistory::new();
        history.advance(seed(500));
        history.advance(seed(600));
        assert_eq!(history.retreat(), Some((0, seed(500))));
        assert_eq!(history.seed_at(1), Some(seed(600)));
    }
}
