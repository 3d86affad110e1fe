//! Dispatch boundary: latency, handler invocation and failure conversion.

use std::sync::Mutex;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use super::latency::LatencyPolicy;
use super::types::{RequestDescriptor, ResponseDescriptor};
use crate::endpoints::{EndpointDefinition, HandlerContext, HandlerError, Registry};
use crate::store::{DealIdGenerator, DealStore, IdStrategy, InMemoryStore};

/// Where "today" comes from when a deal is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSource {
    /// Current UTC date.
    #[default]
    System,
    Fixed(NaiveDate),
}

impl DateSource {
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System => Utc::now().date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}

/// Knobs for constructing a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorOptions {
    pub latency: LatencyPolicy,
    pub id_strategy: IdStrategy,
    /// Seed for random id generation.
    pub seed: u64,
    pub date: DateSource,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            latency: LatencyPolicy::Endpoint,
            id_strategy: IdStrategy::Random,
            seed: 42,
            date: DateSource::System,
        }
    }
}

impl SimulatorOptions {
    /// No latency, sequential ids: deterministic runs for tests.
    pub fn deterministic() -> Self {
        Self {
            latency: LatencyPolicy::Off,
            id_strategy: IdStrategy::Sequential,
            ..Self::default()
        }
    }
}

/// Caller mistakes that prevent a call from being simulated at all.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown endpoint \"{0}\"")]
    UnknownEndpoint(String),
    #[error("store lock poisoned by an earlier panic")]
    Poisoned,
}

struct SimState<S> {
    store: S,
    ids: DealIdGenerator,
}

/// Simulated API over a single shared store.
///
/// Every call waits out its latency first and then locks the store for the
/// synchronous handler body, so writes from one call are visible to the
/// next. The lock is never held across an await point.
pub struct Simulator<S = InMemoryStore> {
    registry: Registry,
    latency: LatencyPolicy,
    date: DateSource,
    state: Mutex<SimState<S>>,
}

impl<S: DealStore> Simulator<S> {
    /// Creates a simulator over `store` with the standard registry.
    pub fn new(store: S, options: SimulatorOptions) -> Self {
        Self {
            registry: Registry::standard(),
            latency: options.latency,
            date: options.date,
            state: Mutex::new(SimState {
                store,
                ids: DealIdGenerator::new(options.id_strategy, options.seed),
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn latency(&self) -> LatencyPolicy {
        self.latency
    }

    /// Simulates one call of `endpoint_id` with `request`.
    ///
    /// The returned response carries `elapsed_ms`. Handler failures are
    /// already converted into 500 responses.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownEndpoint` if `endpoint_id` is not registered.
    pub async fn simulate(
        &self,
        endpoint_id: &str,
        request: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, SimError> {
        let definition = self
            .registry
            .get(endpoint_id)
            .ok_or_else(|| SimError::UnknownEndpoint(endpoint_id.to_string()))?;

        let started = Instant::now();
        self.latency.wait(definition).await;
        let mut response = self.dispatch(definition, request);
        let elapsed = started.elapsed().as_millis();
        response.elapsed_ms = Some(u64::try_from(elapsed).unwrap_or(u64::MAX));

        debug!(
            endpoint = definition.id(),
            method = %request.method,
            path = %request.path,
            status = response.status,
            elapsed_ms = response.elapsed_ms,
            "simulated call"
        );
        Ok(response)
    }

    fn dispatch(
        &self,
        definition: &EndpointDefinition,
        request: &RequestDescriptor,
    ) -> ResponseDescriptor {
        let result = match self.state.lock() {
            Ok(mut guard) => {
                let SimState { store, ids } = &mut *guard;
                let mut ctx = HandlerContext {
                    today: self.date.today(),
                    ids,
                };
                definition.endpoint.handle(request, store, &mut ctx)
            }
            Err(_) => Err(HandlerError::Internal(SimError::Poisoned.to_string())),
        };

        result.unwrap_or_else(|err| {
            warn!(endpoint = definition.id(), error = %err, "handler failed");
            ResponseDescriptor::error(500, err.to_string())
        })
    }

    /// Runs `f` against the store outside of any simulated call.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Poisoned` if a previous holder of the lock panicked.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, SimError> {
        let guard = self.state.lock().map_err(|_| SimError::Poisoned)?;
        Ok(f(&guard.store))
    }
}
