// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Street-closure CLI
//!
//! Processes closure segment lists, traces manual connections through
//! user-placed nodes and exports the result as GeoJSON. State lives in a
//! session file between invocations.

mod session;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use closure_app_core::config::ConfigService;
use closure_app_core::export::export_geojson;
use closure_app_core::prefs::{ConfigPort, PREFS_KEY};
use closure_config_fs::FsConfigStore;
use closure_graph::{NodeId, Position};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::session::{Network, Session};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session file holding the street network
    #[arg(long, global = true, default_value = "closure-session.json")]
    session: PathBuf,

    /// Directory for saved preferences (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a file of closure segments, one per line
    Process {
        /// Input file; blank lines and lines starting with '#' are ignored
        file: PathBuf,
    },
    /// Place a node on the map
    #[command(allow_negative_numbers = true)]
    Node {
        /// Longitude
        #[arg(value_parser = finite_ordinate)]
        lon: f64,
        /// Latitude
        #[arg(value_parser = finite_ordinate)]
        lat: f64,
    },
    /// Trace a manual connection through a path of nodes
    Trace {
        /// Street key the connection stands in for
        #[arg(long)]
        street_key: String,
        /// Path entry: an existing node id, or "LON,LAT" to place a new node
        #[arg(long, required = true, allow_hyphen_values = true)]
        via: Vec<String>,
        /// Keep the street key's failure pending
        #[arg(long)]
        no_replace: bool,
    },
    /// Show failed segments and which of them have been fixed
    Review,
    /// Write the GeoJSON export
    Export {
        /// Output path (defaults to the configured file name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the effective preferences
    Prefs {
        /// Save the effective preferences to the config directory
        #[arg(long)]
        save: bool,
    },
    /// Clear the session
    Reset,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = config_service(args.config_dir.as_deref());
    let prefs = config
        .as_ref()
        .and_then(|config| config.load_prefs())
        .unwrap_or_default();
    let session = Session::new(&args.session);
    let mut out = io::stdout().lock();

    match args.cmd {
        Command::Process { file } => {
            let mut network = session.load(&prefs.ids)?;
            let text = fs::read_to_string(&file)
                .with_context(|| format!("read segments {}", file.display()))?;
            let inputs = segment_lines(&text);
            let result = network.process_segments(inputs.as_slice());
            writeln!(
                out,
                "processed {} segments: {} connected, {} disconnected, {} failed",
                inputs.len(),
                result.features.len(),
                result.disconnected_features.len(),
                result.failures.len()
            )?;
            for failure in &result.failures {
                writeln!(out, "  {}: {}", failure.street_key, failure.error)?;
            }
            session.save(&network)?;
        }
        Command::Node { lon, lat } => {
            let mut network = session.load(&prefs.ids)?;
            let id = network.create_node([lon, lat]);
            writeln!(out, "{id}")?;
            session.save(&network)?;
        }
        Command::Trace {
            street_key,
            via,
            no_replace,
        } => {
            let mut network = session.load(&prefs.ids)?;
            let path = resolve_path(&mut network, &via)?;
            let connection_id = network
                .add_manual_connection(&street_key, &path)
                .with_context(|| format!("trace {street_key}"))?;
            if !no_replace {
                network.replace_disconnected_segments(&street_key, &connection_id);
            }
            if let Some(connection) = network.manual_connection(&connection_id) {
                writeln!(
                    out,
                    "{connection_id}: {} edges, {} unresolved hops",
                    connection.edges.len(),
                    connection.unresolved_hops.len()
                )?;
                for hop in &connection.unresolved_hops {
                    let missing: Vec<&str> = hop.missing.iter().map(NodeId::as_str).collect();
                    writeln!(out, "  hop {} skipped: missing {}", hop.index, missing.join(", "))?;
                }
            }
            session.save(&network)?;
        }
        Command::Review => {
            let network = session.load(&prefs.ids)?;
            review(&mut out, &network)?;
        }
        Command::Export { out: target } => {
            let network = session.load(&prefs.ids)?;
            let artifact = export_geojson(&network, &prefs.export)?;
            let target = target.unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            fs::write(&target, &artifact.body)
                .with_context(|| format!("write export {}", target.display()))?;
            info!(path = %target.display(), "export written");
            writeln!(out, "{} ({})", artifact.summary(), target.display())?;
        }
        Command::Prefs { save } => {
            writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
            if save {
                let Some(config) = config else {
                    bail!("no config directory available");
                };
                config.save(PREFS_KEY, &prefs).context("save prefs")?;
            }
        }
        Command::Reset => {
            let mut network = session.load(&prefs.ids)?;
            network.reset();
            session.save(&network)?;
            writeln!(out, "session cleared: {}", session.path().display())?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn config_service(dir: Option<&Path>) -> Option<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    match store {
        Ok(store) => Some(ConfigService::new(store)),
        Err(err) => {
            warn!(%err, "config store unavailable; using default prefs");
            None
        }
    }
}

fn segment_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// "LON,LAT" pairs become new nodes; anything else is taken as a node id.
fn resolve_path(network: &mut Network, via: &[String]) -> Result<Vec<NodeId>> {
    via.iter()
        .map(|entry| match parse_position(entry)? {
            Some(at) => Ok(network.create_node(at)),
            None => Ok(NodeId::from(entry.as_str())),
        })
        .collect()
}

fn parse_position(entry: &str) -> Result<Option<Position>> {
    let Some((lon, lat)) = entry.split_once(',') else {
        return Ok(None);
    };
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("bad longitude in {entry:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("bad latitude in {entry:?}"))?;
    ensure!(
        lon.is_finite() && lat.is_finite(),
        "coordinates must be finite numbers, got {entry:?}"
    );
    Ok(Some([lon, lat]))
}

/// Clap parser for one ordinate: finite `f64` only.
fn finite_ordinate(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{raw} is not a finite number"))
    }
}

fn review(out: &mut impl Write, network: &Network) -> Result<()> {
    match network.last_results() {
        Some(results) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["Street key", "Status", "Input"]);
            let mut fixed = 0;
            for failure in &results.failures {
                let status = if network.is_segment_replaced(&failure.street_key) {
                    fixed += 1;
                    "Fixed"
                } else {
                    "Pending"
                };
                table.add_row(vec![failure.street_key.as_str(), status, failure.input.as_str()]);
            }
            writeln!(out, "{table}")?;
            writeln!(
                out,
                "{fixed} fixed, {} pending",
                results.failures.len() - fixed
            )?;
        }
        None => writeln!(out, "No processed data. Process segments first.")?,
    }

    let keys = network.fixed_street_keys();
    if !keys.is_empty() {
        writeln!(out, "manually connected: {}", keys.join(", "))?;
    }
    let hash = network.snapshot().compute_hash()?;
    writeln!(out, "state {}", hex::encode(hash))?;
    Ok(())
}
