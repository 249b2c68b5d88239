//! Epoch-stamped visited set for graph traversal.

/// Marks nodes as visited by stamping them with the current epoch.
///
/// `reset()` bumps the epoch instead of clearing the array; the stamps are
/// zeroed only when the epoch counter wraps.
#[derive(Debug, Default)]
pub struct VisitedSet {
    stamps: Vec<u32>,
    epoch: u32,
}

impl VisitedSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            stamps: vec![0; capacity],
            epoch: 1,
        }
    }

    /// Forgets every visited node. O(1) except on epoch wrap-around.
    pub fn reset(&mut self) {
        if self.epoch == u32::MAX {
            self.stamps.fill(0);
            self.epoch = 1;
        } else {
            self.epoch += 1;
        }
    }

    /// Grows the set to cover at least `capacity` nodes.
    pub fn grow(&mut self, capacity: usize) {
        if capacity > self.stamps.len() {
            self.stamps.resize(capacity, 0);
        }
        if self.epoch == 0 {
            self.epoch = 1;
        }
    }

    /// Marks `node` visited. Returns `true` on the first visit since the last reset.
    #[inline]
    pub fn visit(&mut self, node: u32) -> bool {
        let slot = &mut self.stamps[node as usize];
        if *slot == self.epoch {
            false
        } else {
            *slot = self.epoch;
            true
        }
    }
}
