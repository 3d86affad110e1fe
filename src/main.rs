//! Lending API simulator entry point: CLI wiring and config-driven simulator construction.

use std::path::Path;
use std::process;

use lending_api_sim::cli::{self, CallArgs, CliOptions, Command};
use lending_api_sim::config::SimConfig;
use lending_api_sim::io::export::export_deals_csv;
use lending_api_sim::logging;
use lending_api_sim::render::render;
use lending_api_sim::sim::composer::RequestComposer;
use lending_api_sim::sim::session::{SessionScript, run_session};
use lending_api_sim::sim::{Simulator, SimulatorOptions};
use lending_api_sim::store::{DealStore, InMemoryStore};

fn load_config(cli: &CliOptions) -> Result<SimConfig, String> {
    // --config takes priority, then --preset, then the demo defaults
    let mut config = if let Some(ref path) = cli.config {
        SimConfig::from_toml_file(path).map_err(|e| e.to_string())?
    } else if let Some(ref name) = cli.preset {
        SimConfig::from_preset(name).map_err(|e| e.to_string())?
    } else {
        SimConfig::demo()
    };

    if let Some(seed) = cli.seed {
        config.simulator.seed = seed;
    }
    if let Some(ms) = cli.latency_ms {
        config.latency.mode = "fixed".to_string();
        config.latency.fixed_ms = ms;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(lines.join("\n"));
    }
    Ok(config)
}

fn build_simulator(config: &SimConfig) -> Result<Simulator, String> {
    let seed_set = config.seed_set().map_err(|e| e.to_string())?;
    let options: SimulatorOptions = config.simulator_options().map_err(|e| e.to_string())?;
    Ok(Simulator::new(InMemoryStore::seeded(seed_set), options))
}

fn print_registry(simulator: &Simulator) {
    println!("{:<8}{:<26}{:<18}{:>8}  DESCRIPTION", "METHOD", "PATH", "ID", "LATENCY");
    for def in simulator.registry().iter() {
        println!(
            "{:<8}{:<26}{:<18}{:>6}ms  {}",
            def.method.as_str(),
            def.path_template,
            def.id(),
            def.latency_ms,
            def.description
        );
    }
    println!("\nLatency: {}", simulator.latency());
}

async fn run_call(simulator: &Simulator, call: &CallArgs) -> Result<(), String> {
    let definition = simulator.registry().get(&call.endpoint).ok_or_else(|| {
        let ids: Vec<&str> = simulator.registry().iter().map(|d| d.id()).collect();
        format!(
            "unknown endpoint \"{}\", available: {}",
            call.endpoint,
            ids.join(", ")
        )
    })?;

    let mut composer = RequestComposer::for_endpoint(definition);
    if let Some(ref path) = call.path {
        composer = composer.path(path);
    }
    for (key, value) in &call.query {
        composer = composer.query(key, value);
    }
    for (key, value) in &call.headers {
        composer = composer.header(key, value);
    }
    if let Some(ref body) = call.body {
        composer = composer.body(body);
    }
    let request = composer.compose().map_err(|e| e.to_string())?;

    println!("{} {}", request.method, request.path);
    let response = simulator
        .simulate(&call.endpoint, &request)
        .await
        .map_err(|e| e.to_string())?;
    print!("{}", render(&response));
    Ok(())
}

/// Runs a session script; returns `false` if any expected status was missed.
async fn run_script(simulator: &Simulator, path: &Path) -> Result<bool, String> {
    let script = SessionScript::from_toml_file(path).map_err(|e| e.to_string())?;
    let outcomes = run_session(simulator, &script)
        .await
        .map_err(|e| e.to_string())?;

    for outcome in &outcomes {
        let verdict = match outcome.expected_status {
            Some(expected) if !outcome.passed() => format!("FAIL (expected {expected})"),
            Some(_) => "ok".to_string(),
            None => "-".to_string(),
        };
        println!(
            "[{}] {} {} {}  {}",
            outcome.index + 1,
            outcome.endpoint,
            outcome.request.method,
            outcome.request.path,
            verdict
        );
        print!("{}", render(&outcome.response));
        println!();
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    let succeeded = outcomes.iter().filter(|o| o.response.is_success()).count();
    println!(
        "{} calls ({succeeded} returned 2xx), {failed} failed",
        outcomes.len()
    );
    Ok(failed == 0)
}

fn export_deals(simulator: &Simulator, path: &Path) -> Result<(), String> {
    let deals = simulator
        .with_store(|store| store.deals())
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    export_deals_csv(&deals, path).map_err(|e| format!("failed to write CSV: {e}"))?;
    eprintln!("{} deals written to {}", deals.len(), path.display());
    Ok(())
}

fn exit_on_err<T>(result: Result<T, String>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    })
}

fn main() {
    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });

    if cli.command == Command::Help {
        cli::print_usage();
        return;
    }

    let config = exit_on_err(load_config(&cli));
    logging::init(&config.logging.level);
    let simulator = exit_on_err(build_simulator(&config));

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });

    let mut passed = true;
    match &cli.command {
        Command::List => print_registry(&simulator),
        Command::Call(call) => exit_on_err(rt.block_on(run_call(&simulator, call))),
        Command::Session(path) => passed = exit_on_err(rt.block_on(run_script(&simulator, path))),
        #[cfg(feature = "api")]
        Command::Serve => {
            use std::net::SocketAddr;
            use std::sync::Arc;

            let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
            let state = Arc::new(lending_api_sim::api::AppState { simulator });
            let served = rt.block_on(lending_api_sim::api::serve(state, addr));
            exit_on_err(served.map_err(|e| format!("server error: {e}")));
            return;
        }
        Command::Help => {}
    }

    if let Some(ref path) = cli.export_deals {
        exit_on_err(export_deals(&simulator, path));
    }

    if !passed {
        process::exit(1);
    }
}
