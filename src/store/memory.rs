//! Vec-backed store living for the lifetime of the simulator.

use tracing::debug;

use super::repository::{DealStore, StoreError};
use super::seed::SeedSet;
use super::types::{Deal, Facility};

/// In-memory mock data store.
///
/// Deals keep insertion order; updates happen in place and deletes shift
/// the remaining records, mirroring array semantics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    deals: Vec<Deal>,
    facilities: Vec<Facility>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given records.
    pub fn with_records(deals: Vec<Deal>, facilities: Vec<Facility>) -> Self {
        Self { deals, facilities }
    }

    /// Creates a store populated from a named seed set.
    pub fn seeded(seed: SeedSet) -> Self {
        let store = Self::with_records(seed.deals(), seed.facilities());
        debug!(
            deals = store.deals.len(),
            facilities = store.facilities.len(),
            "seeded in-memory store"
        );
        store
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.deals.iter().position(|d| d.id == id)
    }
}

impl DealStore for InMemoryStore {
    fn deals(&self) -> Result<Vec<Deal>, StoreError> {
        Ok(self.deals.clone())
    }

    fn deal(&self, id: &str) -> Result<Option<Deal>, StoreError> {
        Ok(self.deals.iter().find(|d| d.id == id).cloned())
    }

    fn contains_deal(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.position(id).is_some())
    }

    fn insert_deal(&mut self, deal: Deal) -> Result<(), StoreError> {
        if self.position(&deal.id).is_some() {
            return Err(StoreError::DuplicateId(deal.id));
        }
        self.deals.push(deal);
        Ok(())
    }

    fn update_deal(&mut self, deal: Deal) -> Result<bool, StoreError> {
        match self.position(&deal.id) {
            Some(idx) => {
                self.deals[idx] = deal;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_deal(&mut self, id: &str) -> Result<Option<Deal>, StoreError> {
        Ok(self.position(id).map(|idx| self.deals.remove(idx)))
    }

    fn facilities(&self) -> Result<Vec<Facility>, StoreError> {
        Ok(self.facilities.clone())
    }

    fn deal_count(&self) -> Result<usize, StoreError> {
        Ok(self.deals.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::DealStatus;

    fn make_deal(id: &str) -> Deal {
        Deal {
            id: id.to_string(),
            name: format!("Deal {id}"),
            originator: "FinCorp".to_string(),
            amount: 10.0,
            currency: "USD".to_string(),
            status: DealStatus::Draft,
            submission_date: "2024-01-01".to_string(),
            credit_score: None,
            facility_id: None,
            risk_score: None,
        }
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut store = InMemoryStore::new();
        store.insert_deal(make_deal("D1")).unwrap();
        let err = store.insert_deal(make_deal("D1")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "D1"));
        assert_eq!(store.deal_count().unwrap(), 1);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = InMemoryStore::new();
        store.insert_deal(make_deal("D1")).unwrap();
        store.insert_deal(make_deal("D2")).unwrap();

        let mut changed = make_deal("D1");
        changed.status = DealStatus::Approved;
        assert!(store.update_deal(changed).unwrap());

        let deals = store.deals().unwrap();
        assert_eq!(deals[0].id, "D1");
        assert_eq!(deals[0].status, DealStatus::Approved);
        assert!(!store.update_deal(make_deal("D9")).unwrap());
    }

    #[test]
    fn delete_removes_only_target() {
        let mut store = InMemoryStore::new();
        for id in ["D1", "D2", "D3"] {
            store.insert_deal(make_deal(id)).unwrap();
        }

        let removed = store.delete_deal("D2").unwrap();
        assert_eq!(removed.map(|d| d.id), Some("D2".to_string()));
        let ids: Vec<String> = store.deals().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["D1", "D3"]);
        assert!(store.delete_deal("D2").unwrap().is_none());
    }

    #[test]
    fn demo_seed_populates_both_collections() {
        let store = InMemoryStore::seeded(SeedSet::Demo);
        assert!(store.deal_count().unwrap() > 0);
        assert!(!store.facilities().unwrap().is_empty());
        assert!(store.contains_deal("D001").unwrap());
    }
}
