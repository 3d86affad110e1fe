//! Facility endpoint handlers.

use super::HandlerError;
use crate::sim::types::ResponseDescriptor;
use crate::store::DealStore;

/// `GET /api/v1/facilities`
pub(super) fn list(store: &dyn DealStore) -> Result<ResponseDescriptor, HandlerError> {
    let facilities = store.facilities()?;
    Ok(ResponseDescriptor::json(200, serde_json::to_value(&facilities)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, SeedSet};

    #[test]
    fn lists_every_facility() {
        let store = InMemoryStore::seeded(SeedSet::Demo);
        let resp = list(&store).unwrap();
        assert_eq!(resp.status, 200);
        let body = resp.body.unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(3));
        assert_eq!(body[0]["covenants"][0]["status"], "Compliant");
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = InMemoryStore::seeded(SeedSet::Empty);
        let body = list(&store).unwrap().body.unwrap();
        assert_eq!(body, serde_json::json!([]));
    }
}
