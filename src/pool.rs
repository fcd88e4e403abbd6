//! Arena-backed particle pool.
//!
//! Every record ever allocated lives in one `Vec<Particle>` and is addressed
//! by a [`ParticleHandle`] (a slot index). Two index sets partition the arena:
//!
//! - `active` - a dense list of live handles, iterated every tick
//! - `free` - a stack of recycled handles, popped by [`ParticlePool::acquire`]
//!
//! Both transitions are O(1). Removal from `active` is a swap-remove, so the
//! iteration order of live particles is not stable across releases.
//!
//! The pool has no capacity cap. If emission outpaces recycling the arena
//! keeps growing; [`ParticlePool::allocated`] is exposed so hosts can watch
//! for it.

use crate::particle::Particle;

/// Index of a particle slot in a [`ParticlePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleHandle(u32);

impl ParticleHandle {
    /// Slot index inside the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Position inside the `active` list.
    Active(u32),
    Free,
}

/// Free-list allocator for particle records.
#[derive(Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    slots: Vec<Slot>,
    active: Vec<ParticleHandle>,
    free: Vec<ParticleHandle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool with room for `capacity` records before the arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Activate a record, reusing a recycled slot when one is available.
    ///
    /// The returned record holds whatever `particle` contains.
    pub fn acquire(&mut self, particle: Particle) -> ParticleHandle {
        let handle = match self.free.pop() {
            Some(handle) => {
                self.particles[handle.index()] = particle;
                handle
            }
            None => {
                let handle = ParticleHandle(self.particles.len() as u32);
                self.particles.push(particle);
                self.slots.push(Slot::Free);
                handle
            }
        };

        self.slots[handle.index()] = Slot::Active(self.active.len() as u32);
        self.active.push(handle);
        handle
    }

    /// Return a record to the free set and reset its fields.
    ///
    /// Returns `false` (and does nothing) if the handle is unknown or already
    /// free, so a double release can never corrupt the free list.
    pub fn release(&mut self, handle: ParticleHandle) -> bool {
        let position = match self.slots.get(handle.index()) {
            Some(Slot::Active(position)) => *position as usize,
            Some(Slot::Free) | None => {
                log::trace!("ignoring release of inactive particle slot {}", handle.index());
                return false;
            }
        };

        self.active.swap_remove(position);
        if let Some(&moved) = self.active.get(position) {
            self.slots[moved.index()] = Slot::Active(position as u32);
        }

        self.slots[handle.index()] = Slot::Free;
        self.particles[handle.index()] = Particle::default();
        self.free.push(handle);
        true
    }

    /// Drop every record, returning the pool to its empty state.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.slots.clear();
        self.active.clear();
        self.free.clear();
    }

    #[inline]
    pub fn is_active(&self, handle: ParticleHandle) -> bool {
        matches!(self.slots.get(handle.index()), Some(Slot::Active(_)))
    }

    #[inline]
    pub fn is_free(&self, handle: ParticleHandle) -> bool {
        matches!(self.slots.get(handle.index()), Some(Slot::Free))
    }

    #[inline]
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.particles.get(handle.index())
    }

    #[inline]
    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.particles.get_mut(handle.index())
    }

    /// Live handles, in storage order.
    #[inline]
    pub fn active_handles(&self) -> &[ParticleHandle] {
        &self.active
    }

    /// Handle at position `i` of the active list.
    #[inline]
    pub(crate) fn active_at(&self, i: usize) -> Option<ParticleHandle> {
        self.active.get(i).copied()
    }

    /// Iterate over live particles.
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.active.iter().map(move |h| &self.particles[h.index()])
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Number of records ever allocated.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.particles.len()
    }

    /// Check that `active` and `free` partition the arena exactly.
    pub fn is_partitioned(&self) -> bool {
        if self.active.len() + self.free.len() != self.particles.len() {
            return false;
        }

        let mut seen = vec![false; self.particles.len()];
        for (position, handle) in self.active.iter().enumerate() {
            let i = handle.index();
            if i >= seen.len() || seen[i] || self.slots[i] != Slot::Active(position as u32) {
                return false;
            }
            seen[i] = true;
        }
        for handle in &self.free {
            let i = handle.index();
            if i >= seen.len() || seen[i] || self.slots[i] != Slot::Free {
                return false;
            }
            seen[i] = true;
        }
        seen.into_iter().all(|s| s)
    }
}
