use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use formats::ColumnSet;
use foundation::GeoBounds;
use panel::{
    Bridge, PanelOptions, RemountPolicy, options_schema, render_frame_with, select_command,
    selected_id,
};
use runtime::{VariableCommand, VariableSink};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Offline driver for the map select panel")]
struct Args {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the layer plan for a column set and print it as JSON
    Render {
        /// Column set JSON (`{"series": [...]}`)
        #[arg(long)]
        data: PathBuf,

        /// Panel options JSON; defaults apply when omitted
        #[arg(long)]
        options: Option<PathBuf>,

        /// Host variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Keep layer keys equal to their position
        #[arg(long)]
        stable_keys: bool,
    },
    /// Print the variable update a click on a feature produces
    Select {
        /// Feature id; omit to clear the selection
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the variable update a settled viewport produces
    Viewport {
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,

        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Print the options schema for the host editor
    Schema,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let pretty = args.pretty;
    match args.command {
        Command::Render {
            data,
            options,
            vars,
            stable_keys,
        } => cmd_render(&data, options.as_deref(), vars, stable_keys, pretty),
        Command::Select { id } => {
            let mut sink = PrintSink::new(pretty);
            sink.send(select_command(id.as_deref()));
            sink.finish()
        }
        Command::Viewport {
            south,
            west,
            north,
            east,
            options,
        } => {
            let options = load_options(options.as_deref())?;
            let bounds = GeoBounds::from_edges(south, west, north, east);
            let mut sink = PrintSink::new(pretty);
            Bridge::new(&options.map, &mut sink).on_viewport_change(bounds);
            if sink.printed == 0 {
                info!("bounds variables disabled; nothing to write");
            }
            sink.finish()
        }
        Command::Schema => print_json(&options_schema(), pretty),
    }
}

fn cmd_render(
    data: &Path,
    options: Option<&Path>,
    vars: Vec<(String, String)>,
    stable_keys: bool,
    pretty: bool,
) -> Result<(), String> {
    let payload = fs::read_to_string(data).map_err(|e| format!("read {data:?}: {e}"))?;
    let set = ColumnSet::from_json_str(&payload).map_err(|e| e.to_string())?;
    let options = load_options(options)?;
    let variables: BTreeMap<String, String> = vars.into_iter().collect();

    let policy = if stable_keys {
        RemountPolicy::Stable
    } else {
        RemountPolicy::ShiftSelectedKey
    };
    let frame = render_frame_with(&set, &selected_id(&variables), &options, policy);
    info!(
        layers = frame.layers.len(),
        skipped = frame.skipped.len(),
        "rendered frame"
    );
    print_json(&frame, pretty)
}

fn load_options(path: Option<&Path>) -> Result<PanelOptions, String> {
    let Some(path) = path else {
        return Ok(PanelOptions::default());
    };
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let options = PanelOptions::from_json_str(&payload).map_err(|e| e.to_string())?;
    if let Err(e) = options.validate() {
        warn!("{e}");
    }
    Ok(options)
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("empty variable name in {s:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(|e| format!("encode json: {e}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    println!("{}", to_json(value, pretty)?);
    Ok(())
}

/// Prints each command as the host's query update, one JSON document per line.
struct PrintSink {
    pretty: bool,
    printed: usize,
    error: Option<String>,
}

impl PrintSink {
    fn new(pretty: bool) -> Self {
        Self {
            pretty,
            printed: 0,
            error: None,
        }
    }

    fn finish(self) -> Result<(), String> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl VariableSink for PrintSink {
    fn send(&mut self, command: VariableCommand) {
        match to_json(&command.query_update(), self.pretty) {
            Ok(line) => {
                println!("{line}");
                self.printed += 1;
            }
            Err(e) => self.error = Some(e),
        }
    }
}
