//! Mock data store: deal and facility records behind a repository trait.

/// Deal id generation strategies.
pub mod ids;
pub mod memory;
pub mod repository;
/// Seed records for fresh stores.
pub mod seed;
pub mod types;

pub use ids::{DealIdGenerator, IdStrategy};
pub use memory::InMemoryStore;
pub use repository::{DealStore, StoreError};
pub use seed::SeedSet;
pub use types::{
    Covenant, CovenantStatus, Deal, DealStatus, Facility, FacilityStatus, FacilityType,
};
