//! Two-phase allocate/resolve bookkeeping for object positions.
//!
//! A writer asks the builder for an [`ObjectId`] as soon as it needs to
//! reference an object, which may be long before that object's bytes are
//! emitted. Each id then waits in [`ReservationState::Unresolved`] until the
//! writer records where the object landed. Once every id is resolved the
//! builder produces the final [`XRefTable`].

use crate::error::{PdfError, Result};
use crate::objects::ObjectId;
use crate::xref::entry::XRefEntry;
use crate::xref::id_generator::ObjectNumberGenerator;
use crate::xref::table::XRefTable;
use std::collections::HashMap;

/// Resolution state of one allocated reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    Unresolved,
    Resolved(u64),
}

impl ReservationState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ReservationState::Resolved(_))
    }

    pub fn offset(&self) -> Option<u64> {
        match self {
            ReservationState::Resolved(offset) => Some(*offset),
            ReservationState::Unresolved => None,
        }
    }
}

/// Tracks every reference allocated during one document build.
///
/// Not shared between threads: one builder per build session.
#[derive(Debug, Default)]
pub struct ReferenceTableBuilder {
    ids: ObjectNumberGenerator,
    states: HashMap<ObjectId, ReservationState>,
}

impl ReferenceTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(ids: ObjectNumberGenerator) -> Self {
        Self {
            ids,
            states: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> ObjectId {
        ObjectId::new(self.ids.next_number(), 0)
    }

    /// Allocates a reference whose position is not known yet.
    pub fn reserve_id(&mut self) -> ObjectId {
        let id = self.next_id();
        self.states.insert(id, ReservationState::Unresolved);
        tracing::trace!(%id, "reserved forward reference");
        id
    }

    /// Allocates a reference for an object about to be written at `offset`.
    pub fn allocate(&mut self, offset: u64) -> ObjectId {
        let id = self.next_id();
        self.states.insert(id, ReservationState::Resolved(offset));
        tracing::trace!(%id, offset, "allocated reference");
        id
    }

    /// Records the position of a reserved reference.
    ///
    /// Returns `false` without touching the stored offset when `id` is
    /// already resolved or was not allocated by this builder.
    pub fn try_set_position(&mut self, id: ObjectId, offset: u64) -> bool {
        match self.states.get_mut(&id) {
            Some(state) if !state.is_resolved() => {
                *state = ReservationState::Resolved(offset);
                true
            }
            _ => false,
        }
    }

    /// Like [`Self::try_set_position`], but reports why the position was
    /// rejected.
    pub fn set_position(&mut self, id: ObjectId, offset: u64) -> Result<()> {
        match self.states.get_mut(&id) {
            Some(ReservationState::Resolved(existing)) => {
                tracing::error!(%id, existing = *existing, offset, "object written twice");
                Err(PdfError::PositionAlreadySet(id))
            }
            Some(state) => {
                *state = ReservationState::Resolved(offset);
                Ok(())
            }
            None => Err(PdfError::UnknownReference(id)),
        }
    }

    pub fn state(&self, id: ObjectId) -> Option<ReservationState> {
        self.states.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Allocated references still waiting for a position, by object number.
    pub fn unresolved(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .states
            .iter()
            .filter(|(_, state)| !state.is_resolved())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// True when every allocated reference has a position.
    pub fn validate(&self) -> bool {
        let unresolved = self.unresolved();
        for id in &unresolved {
            tracing::warn!(%id, "reference was never written");
        }
        unresolved.is_empty()
    }

    pub fn ensure_resolved(&self) -> Result<()> {
        let unresolved = self.unresolved();
        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(PdfError::UnresolvedReferences(unresolved))
        }
    }

    /// Produces the finalized table: object 0 sentinel followed by one entry
    /// per object number up to the highest allocated one.
    pub fn build_table(&self) -> Result<XRefTable> {
        self.ensure_resolved()?;

        let mut resolved: Vec<(ObjectId, u64)> = self
            .states
            .iter()
            .filter_map(|(id, state)| state.offset().map(|offset| (*id, offset)))
            .collect();
        resolved.sort_by_key(|(id, _)| id.number());

        let max_number = resolved.last().map(|(id, _)| id.number()).unwrap_or(0);
        let mut entries = Vec::with_capacity(max_number as usize);
        let mut pending = resolved.into_iter().peekable();

        for number in 1..=max_number {
            match pending.next_if(|(id, _)| id.number() == number) {
                Some((id, offset)) => entries.push(XRefEntry::in_use(offset, id.generation())?),
                None => {
                    // Issued by the generator before this builder owned it
                    tracing::debug!(number, "filling unallocated object number with free entry");
                    entries.push(XRefEntry::free(0));
                }
            }
        }

        tracing::debug!(objects = entries.len(), "built cross-reference table");
        Ok(XRefTable::new(entries))
    }
}
