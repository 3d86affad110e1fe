//! Command-line argument parsing for the `lending-api-sim` binary.

use std::env;
use std::path::PathBuf;

/// What the binary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the endpoint registry.
    List,
    /// Compose, simulate and render one call.
    Call(CallArgs),
    /// Run a TOML session script.
    Session(PathBuf),
    /// Serve the simulated API over HTTP.
    #[cfg(feature = "api")]
    Serve,
    Help,
}

/// Request fields given with `--call`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    pub endpoint: String,
    pub path: Option<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub latency_ms: Option<u64>,
    pub export_deals: Option<PathBuf>,
    pub port: Option<u16>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut command: Option<Command> = None;
    let mut call = CallArgs::default();
    let mut call_fields = false;
    let mut config = None;
    let mut preset = None;
    let mut seed = None;
    let mut latency_ms = None;
    let mut export_deals = None;
    #[cfg_attr(not(feature = "api"), allow(unused_mut))]
    let mut port = None;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(CliOptions::help()),
            "--list" => set_command(&mut command, Command::List, "--list")?,
            "--call" => {
                i += 1;
                let id = args.next_or_err(i, "missing value for --call (expected an endpoint id)")?;
                call.endpoint = id.to_string();
                set_command(&mut command, Command::Call(CallArgs::default()), "--call")?;
            }
            "--session" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --session (expected a TOML file path)",
                )?;
                set_command(&mut command, Command::Session(PathBuf::from(path)), "--session")?;
            }
            #[cfg(feature = "api")]
            "--serve" => set_command(&mut command, Command::Serve, "--serve")?,
            "--path" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --path (expected a request path)",
                )?;
                if call.path.replace(path.to_string()).is_some() {
                    return Err("--path provided more than once".to_string());
                }
                call_fields = true;
            }
            "--query" => {
                i += 1;
                let pair = args.next_or_err(i, "missing value for --query (expected key=value)")?;
                call.query.push(parse_pair(pair, "--query")?);
                call_fields = true;
            }
            "--header" => {
                i += 1;
                let pair = args.next_or_err(i, "missing value for --header (expected key=value)")?;
                call.headers.push(parse_pair(pair, "--header")?);
                call_fields = true;
            }
            "--body" => {
                i += 1;
                let body = args.next_or_err(i, "missing value for --body (expected JSON text)")?;
                if call.body.replace(body.to_string()).is_some() {
                    return Err("--body provided more than once".to_string());
                }
                call_fields = true;
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --preset (expected a preset name)",
                )?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                seed = Some(value);
            }
            "--latency-ms" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --latency-ms (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--latency-ms value \"{raw}\" is not a valid u64"))?;
                latency_ms = Some(value);
            }
            "--export-deals" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --export-deals (expected a file path)",
                )?;
                if export_deals.replace(PathBuf::from(path)).is_some() {
                    return Err("--export-deals provided more than once".to_string());
                }
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let value = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                port = Some(value);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let command = match command.unwrap_or(Command::List) {
        Command::Call(_) => Command::Call(call),
        other => {
            if call_fields {
                return Err(
                    "`--path`, `--query`, `--header` and `--body` require `--call`".to_string(),
                );
            }
            other
        }
    };

    Ok(CliOptions {
        command,
        config,
        preset,
        seed,
        latency_ms,
        export_deals,
        port,
    })
}

impl CliOptions {
    fn help() -> Self {
        Self {
            command: Command::Help,
            config: None,
            preset: None,
            seed: None,
            latency_ms: None,
            export_deals: None,
            port: None,
        }
    }
}

fn set_command(slot: &mut Option<Command>, command: Command, flag: &str) -> Result<(), String> {
    match slot {
        Some(_) => Err(format!(
            "{flag} conflicts with another mode; use one of --list, --call, --session{}",
            if cfg!(feature = "api") { ", --serve" } else { "" }
        )),
        None => {
            *slot = Some(command);
            Ok(())
        }
    }
}

fn parse_pair(raw: &str, flag: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("{flag} value \"{raw}\" must look like key=value"))?;
    if key.trim().is_empty() {
        return Err(format!("{flag} value \"{raw}\" has an empty key"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("lending-api-sim: simulated lending-platform API explorer");
    eprintln!();
    eprintln!("Usage: lending-api-sim [MODE] [OPTIONS]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  --list                   Print the endpoint registry (default)");
    eprintln!("  --call <endpoint-id>     Simulate one call and print the response");
    eprintln!("  --session <path>         Run a TOML script of calls");
    #[cfg(feature = "api")]
    eprintln!("  --serve                  Serve the simulated API over HTTP");
    eprintln!();
    eprintln!("Call options:");
    eprintln!("  --path <path>            Concrete request path (default: endpoint example)");
    eprintln!("  --query <key=value>      Query parameter, repeatable");
    eprintln!("  --header <key=value>     Request header, repeatable");
    eprintln!("  --body <json>            Request body");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (demo, test, empty)");
    eprintln!("  --seed <u64>             Override the id seed");
    eprintln!("  --latency-ms <u64>       Use a fixed latency for every endpoint");
    eprintln!("  --export-deals <path>    Write the deal collection to CSV on exit");
    #[cfg(feature = "api")]
    eprintln!("  --port <u16>             API server port (default: from config, 3000)");
    eprintln!("  --help                   Show this help message");
}
