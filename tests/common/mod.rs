//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use lending_api_sim::sim::composer::RequestComposer;
use lending_api_sim::sim::types::{RequestDescriptor, ResponseDescriptor};
use lending_api_sim::sim::{Simulator, SimulatorOptions};
use lending_api_sim::store::{DealStore, InMemoryStore, SeedSet};

/// Demo data, no latency, sequential ids starting at `D1000`.
pub fn demo_simulator() -> Simulator {
    Simulator::new(
        InMemoryStore::seeded(SeedSet::Demo),
        SimulatorOptions::deterministic(),
    )
}

/// Composes a request for `endpoint`, overriding the example path and body
/// when given.
pub fn compose(
    simulator: &Simulator,
    endpoint: &str,
    path: Option<&str>,
    body: Option<&str>,
) -> RequestDescriptor {
    let definition = simulator
        .registry()
        .get(endpoint)
        .unwrap_or_else(|| panic!("unknown endpoint {endpoint}"));
    let mut composer = RequestComposer::for_endpoint(definition);
    if let Some(path) = path {
        composer = composer.path(path);
    }
    if let Some(body) = body {
        composer = composer.body(body);
    }
    composer.compose().expect("path should fit the template")
}

/// Composes and simulates one call.
pub async fn call(
    simulator: &Simulator,
    endpoint: &str,
    path: Option<&str>,
    body: Option<&str>,
) -> ResponseDescriptor {
    let request = compose(simulator, endpoint, path, body);
    simulator
        .simulate(endpoint, &request)
        .await
        .expect("endpoint should be registered")
}

/// Number of deals currently in the simulator's store.
pub fn deal_count(simulator: &Simulator) -> usize {
    simulator
        .with_store(|store| store.deal_count())
        .expect("store lock")
        .expect("store read")
}

/// Ids of all deals in store order.
pub fn deal_ids(simulator: &Simulator) -> Vec<String> {
    simulator
        .with_store(|store| store.deals())
        .expect("store lock")
        .expect("store read")
        .into_iter()
        .map(|d| d.id)
        .collect()
}
