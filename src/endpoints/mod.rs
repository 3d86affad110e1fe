//! Simulated lending-platform endpoints and their handlers.
//!
//! Each endpoint is a variant of [`Endpoint`]; dispatch is an exhaustive
//! match, so adding a variant without a handler or a registry definition
//! does not compile.

mod deals;
mod facilities;
pub mod registry;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sim::types::{RequestDescriptor, ResponseDescriptor};
use crate::store::{DealIdGenerator, DealStore, StoreError};

pub use registry::{EndpointDefinition, Registry, ResolveError, Resolved};

/// Base path shared by all deal endpoints.
pub const DEALS_PATH: &str = "/api/v1/deals";
/// Path of the facility listing.
pub const FACILITIES_PATH: &str = "/api/v1/facilities";

/// One simulated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    ListDeals,
    GetDeal,
    CreateDeal,
    UpdateDeal,
    DeleteDeal,
    ListFacilities,
}

impl Endpoint {
    /// All endpoints in registry order.
    pub const ALL: [Endpoint; 6] = [
        Endpoint::ListDeals,
        Endpoint::GetDeal,
        Endpoint::CreateDeal,
        Endpoint::UpdateDeal,
        Endpoint::DeleteDeal,
        Endpoint::ListFacilities,
    ];

    /// Stable identifier used by callers and the CLI.
    pub fn id(self) -> &'static str {
        match self {
            Self::ListDeals => "list-deals",
            Self::GetDeal => "get-deal",
            Self::CreateDeal => "create-deal",
            Self::UpdateDeal => "update-deal",
            Self::DeleteDeal => "delete-deal",
            Self::ListFacilities => "list-facilities",
        }
    }

    /// Runs this endpoint's handler against `store`.
    ///
    /// Validation and not-found outcomes are returned as `Ok` responses
    /// with 4xx statuses.
    ///
    /// # Errors
    ///
    /// Returns a `HandlerError` only for unexpected failures; the simulator
    /// converts those into 500 responses.
    pub fn handle(
        self,
        request: &RequestDescriptor,
        store: &mut dyn DealStore,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<ResponseDescriptor, HandlerError> {
        match self {
            Self::ListDeals => deals::list(request, store),
            Self::GetDeal => deals::get(request, store),
            Self::CreateDeal => deals::create(request, store, ctx),
            Self::UpdateDeal => deals::update(request, store),
            Self::DeleteDeal => deals::delete(request, store),
            Self::ListFacilities => facilities::list(store),
        }
    }
}

/// Per-call inputs a handler needs besides the request and the store.
pub struct HandlerContext<'a> {
    /// Date stamped on newly created deals.
    pub today: NaiveDate,
    pub ids: &'a mut DealIdGenerator,
}

/// Unexpected handler failure, reported to the caller as a 500.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode response body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Internal(String),
}
