use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::engine::{ViewerConfig, ViewerEngine};
use crate::frame::{FinalFrameState, NullRenderer};
use crate::input::{parse_assignment, EditValue, Field};
use crate::preset::Preset;
use crate::sync::{DisplayState, LogBroadcaster};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the viewer headlessly and dump composed frames as JSON lines
    Run {
        /// Number of ticks to run
        #[arg(long, default_value_t = 600)]
        ticks: usize,

        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 16.0)]
        dt_ms: f64,

        /// Preset to apply before the first tick (repeatable, applied in order)
        #[arg(long)]
        preset: Vec<String>,

        /// Manual edit as field=value, applied after presets (repeatable)
        #[arg(long = "set")]
        set: Vec<String>,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write every Nth tick
        #[arg(long, default_value_t = 1)]
        every: usize,

        /// Pause the clock after this many ticks
        #[arg(long)]
        pause_after: Option<usize>,
    },
    /// List the built-in presets and their field tables
    Presets,
    /// Print the default composed frame
    Defaults,
}

#[derive(Serialize)]
struct TickRecord<'a> {
    tick: usize,
    time: f64,
    display: &'a DisplayState,
    frame: &'a FinalFrameState,
}

#[derive(Serialize)]
struct PresetEdit {
    field: Field,
    value: EditValue,
}

#[derive(Serialize)]
struct PresetListing {
    name: &'static str,
    resets: bool,
    edits: Vec<PresetEdit>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { ticks, dt_ms, preset, set, config, out, every, pause_after } => {
            let config = match config {
                Some(path) => ViewerConfig::from_json_file(&path)?,
                None => ViewerConfig::default(),
            };
            let writer: Box<dyn Write> = match out {
                Some(path) => Box::new(BufWriter::new(
                    File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(std::io::stdout().lock()),
            };
            let options = RunOptions { ticks, dt_ms, every, pause_after };
            run_headless(config, &preset, &set, options, writer)?;
        }
        Commands::Presets => {
            let listings: Vec<PresetListing> = Preset::ALL
                .iter()
                .map(|preset| PresetListing {
                    name: preset.name(),
                    resets: preset.resets(),
                    edits: preset
                        .table()
                        .into_iter()
                        .map(|(field, value)| PresetEdit { field, value })
                        .collect(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
        Commands::Defaults => {
            let engine = ViewerEngine::default();
            println!("{}", serde_json::to_string_pretty(&engine.compose_now())?);
        }
    }
    Ok(())
}

struct RunOptions {
    ticks: usize,
    dt_ms: f64,
    every: usize,
    pause_after: Option<usize>,
}

fn run_headless(
    config: ViewerConfig,
    presets: &[String],
    edits: &[String],
    options: RunOptions,
    mut writer: Box<dyn Write>,
) -> Result<()> {
    if !options.dt_ms.is_finite() || options.dt_ms <= 0.0 {
        return Err(anyhow!("--dt-ms must be a positive number, got {}", options.dt_ms));
    }

    let mut engine = ViewerEngine::new(config);
    for name in presets {
        if !engine.apply_preset(name) {
            return Err(anyhow!("Unknown preset '{}'", name));
        }
    }
    for assignment in edits {
        let (field, value) = parse_assignment(assignment).with_context(|| format!("Bad --set '{}'", assignment))?;
        engine.on_manual_edit(field, value);
    }

    log::info!("Running {} ticks at {} ms", options.ticks, options.dt_ms);

    let every = options.every.max(1);
    let mut broadcaster = LogBroadcaster;
    let mut renderer = NullRenderer;
    for tick in 0..options.ticks {
        if options.pause_after == Some(tick) {
            engine.pause();
        }
        engine.step(options.dt_ms, &mut broadcaster, &mut renderer);

        if (tick + 1) % every == 0 {
            let display = engine.display();
            let record = TickRecord {
                tick: tick + 1,
                time: engine.time(),
                display: &display,
                frame: engine.frame(),
            };
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}
