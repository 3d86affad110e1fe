//! Repository contract between endpoint handlers and the data backing.

use super::types::{Deal, Facility};

/// Failure reported by a store backend.
///
/// Handlers surface these as 500 responses.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("deal {0} already exists")]
    DuplicateId(String),
    #[error("no free deal id left after probing {probed} candidates")]
    IdSpaceExhausted { probed: usize },
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the deal and facility collections.
pub trait DealStore: Send {
    /// Returns all deals in insertion order.
    fn deals(&self) -> Result<Vec<Deal>, StoreError>;

    /// Returns the deal with the given id, if present.
    fn deal(&self, id: &str) -> Result<Option<Deal>, StoreError>;

    /// Returns `true` if a deal with `id` exists.
    fn contains_deal(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.deal(id)?.is_some())
    }

    /// Appends a new deal.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the id is already taken.
    fn insert_deal(&mut self, deal: Deal) -> Result<(), StoreError>;

    /// Replaces the stored deal that has the same id.
    ///
    /// Returns `false` if no such deal exists.
    fn update_deal(&mut self, deal: Deal) -> Result<bool, StoreError>;

    /// Removes and returns the deal with `id`, if present.
    fn delete_deal(&mut self, id: &str) -> Result<Option<Deal>, StoreError>;

    /// Returns all facilities.
    fn facilities(&self) -> Result<Vec<Facility>, StoreError>;

    /// Number of deals currently stored.
    fn deal_count(&self) -> Result<usize, StoreError> {
        Ok(self.deals()?.len())
    }
}
