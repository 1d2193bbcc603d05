use anyhow::{Context, Result};
use clap::Parser;
use detector3d::io::{read_parameters, write_parameters};
use detector3d::logging::init_logging;
use detector3d::sd::Hit;
use detector3d::{
    Command, ConcentricGeometryBuilder, GeometryParameters, MaterialCatalog, Point,
    ReconfigurationController, RunManager, RunMetadata, RunMetadataSink, VolumeKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Builds the detector, applies operator commands and runs a batch of
/// uniformly distributed test events.
#[derive(Parser, Debug)]
#[command(name = "detector3d", version, about)]
struct Args {
    /// Detector parameters (JSON). Missing fields use the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Commands to apply after the first initialization (JSON list).
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long)]
    log_level: Option<String>,

    /// Number of events to process.
    #[arg(long, default_value_t = 1000)]
    events: usize,

    /// Surface points per volume for the overlap check (0 disables it).
    #[arg(long, default_value_t = 1000)]
    overlap_samples: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Writes the final parameters to this file.
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

/// Prints the run metadata as JSON.
struct StdoutSink;

impl RunMetadataSink for StdoutSink {
    fn fill_metadata(&mut self, metadata: &RunMetadata) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        Ok(())
    }
}

fn read_commands(path: &Path) -> Result<Vec<Command>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to deserialize commands from: {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let params = match &args.config {
        Some(path) => read_parameters(path)?,
        None => GeometryParameters::default(),
    };
    let catalog = Arc::new(MaterialCatalog::new());
    let builder = ConcentricGeometryBuilder::new().with_overlap_check(args.overlap_samples);
    let engine = RunManager::default();
    let mut controller = ReconfigurationController::new(params, catalog, &engine);

    engine
        .initialize(controller.parameters(), controller.catalog(), &builder)
        .context("Detector construction failed")?;

    if let Some(path) = &args.commands {
        let commands = read_commands(path)?;
        let total = commands.len();
        let accepted = commands
            .into_iter()
            .filter(|c| controller.apply(c.clone()).is_ok())
            .count();
        log::info!("Applied {} of {} commands", accepted, total);
        engine
            .initialize(controller.parameters(), controller.catalog(), &builder)
            .context("Detector reconstruction failed")?;
    }

    let seed = args.seed;
    engine.beam_on(args.events, |event, geometry, sd| {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(event as u64));
        let world = geometry.world();
        let half = 0.5 * world.length();
        let r = world.outer_radius() * rng.r#gen::<f64>().sqrt();
        let phi = 2.0 * PI * rng.r#gen::<f64>();
        let p = Point::from_cylindrical(r, phi, rng.gen_range(-half..half));

        if geometry.locate(p).is_some_and(|v| v.kind == VolumeKind::Target) {
            sd.record(Hit {
                event,
                position: p,
                energy_deposit: rng.gen_range(0.0..1.0),
            });
        }
    })?;

    engine.end_of_run(controller.parameters(), &mut StdoutSink)?;

    if let Some(path) = &args.dump_config {
        write_parameters(path, controller.parameters())?;
        log::info!("Wrote configuration to {}", path.display());
    }
    Ok(())
}
