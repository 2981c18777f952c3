//! The conflict resolver state machine.
//!
//! Conflicts are presented one at a time and resolved with one of three
//! choices. State is an explicit tagged union so every `(state, input)` pair
//! can be covered by tests, and a store failure leaves both the state and
//! the conflict untouched for retry.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sync::{without_id, Conflict, PendingChange};

/// Where the resolver is in its walk of the conflict queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// Not started.
    Idle,
    /// Presenting the conflict at `index` for a decision.
    Presenting {
        /// Index into the loaded conflict list.
        index: usize,
    },
    /// Every conflict has been resolved.
    Done,
}

/// The user's decision for one presented conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Discard the local change; the server record stands.
    KeepServer,
    /// Re-queue the local data as a new pending change.
    KeepMine,
    /// Re-queue the local data with its identifier cleared, creating a new
    /// record alongside the server's.
    KeepBoth,
}

/// Backing store the resolver drives.
///
/// `finish` must apply the optional re-queue and the resolved mark as one
/// atomic unit; a failure must leave the conflict unresolved.
pub trait ConflictStore {
    /// Load all unresolved conflicts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn unresolved(&mut self) -> Result<Vec<Conflict>>;

    /// Mark the conflict resolved, enqueueing `requeue` in the same atomic
    /// unit when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; in that case neither
    /// the mark nor the re-queue may take effect.
    fn finish(&mut self, conflict_id: i64, requeue: Option<PendingChange>) -> Result<()>;
}

/// Walks a queue of conflicts, applying one resolution per step.
#[derive(Debug)]
pub struct ConflictResolver<S> {
    store: S,
    conflicts: Vec<Conflict>,
    state: ResolverState,
}

impl<S: ConflictStore> ConflictResolver<S> {
    /// Create an idle resolver over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            conflicts: Vec::new(),
            state: ResolverState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// The conflict currently presented, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Conflict> {
        match self.state {
            ResolverState::Presenting { index } => self.conflicts.get(index),
            _ => None,
        }
    }

    /// Number of conflicts loaded at start.
    #[must_use]
    pub fn total(&self) -> usize {
        self.conflicts.len()
    }

    /// Load unresolved conflicts and present the first, or go straight to
    /// `Done` when there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read; the resolver stays
    /// `Idle`.
    pub fn start(&mut self) -> Result<ResolverState> {
        let conflicts = self.store.unresolved()?;
        debug!("loaded {} unresolved conflicts", conflicts.len());
        self.conflicts = conflicts;
        self.state = if self.conflicts.is_empty() {
            ResolverState::Done
        } else {
            ResolverState::Presenting { index: 0 }
        };
        Ok(self.state)
    }

    /// Apply a resolution to the presented conflict and advance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConflictPresented`] outside the `Presenting`
    /// state. A store failure is logged and returned, and the state does not
    /// advance: the same conflict is presented again for retry.
    pub fn resolve(&mut self, resolution: Resolution) -> Result<ResolverState> {
        let ResolverState::Presenting { index } = self.state else {
            return Err(Error::NoConflictPresented);
        };
        let conflict = self
            .conflicts
            .get(index)
            .ok_or_else(|| Error::internal(format!("presenting index {index} out of range")))?;

        let requeue = match resolution {
            Resolution::KeepServer => None,
            Resolution::KeepMine => Some(PendingChange::create(
                conflict.kind,
                conflict.local_data.clone(),
            )),
            Resolution::KeepBoth => Some(PendingChange::create(
                conflict.kind,
                without_id(&conflict.local_data),
            )),
        };

        if let Err(err) = self.store.finish(conflict.id, requeue) {
            warn!(
                "failed to resolve conflict {}: {err}; leaving it presented",
                conflict.id
            );
            return Err(err);
        }
        debug!("conflict {} resolved with {resolution:?}", conflict.id);

        self.state = if index + 1 < self.conflicts.len() {
            ResolverState::Presenting { index: index + 1 }
        } else {
            ResolverState::Done
        };
        Ok(self.state)
    }

    /// Consume the resolver, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }
}
