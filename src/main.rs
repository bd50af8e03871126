mod animation;
mod braille;
mod config;
mod engine;
mod error;
mod export;
mod lattice;
mod plot;
mod presets;
mod walker;

use animation::GrowthRecorder;
use clap::Parser;
use config::SnowflakeConfig;
use engine::GrowthEngine;
use env_logger::Env;
use log::{debug, info};
use presets::{Preset, PresetManager};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "snowflake-dla")]
#[command(about = "Diffusion-limited snowflake growth on a triangular lattice")]
struct Args {
    // === Growth Parameters ===
    /// Radius of the hexagonal region walkers live in [default: 90]
    #[arg(short = 'm', long = "mesh-length")]
    mesh_length: Option<u32>,

    /// Target nucleus size, origin included [default: 3000]
    #[arg(short = 'n', long = "limit")]
    nucleus_upper_limit: Option<usize>,

    /// Wind level in [0, 1/6], 0 = isotropic [default: 0]
    #[arg(short = 'w', long = "wind")]
    wind_level: Option<f64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    // === Configuration ===
    /// Start from a named preset (see --list-presets)
    #[arg(short = 'p', long)]
    preset: Option<String>,

    /// Load run configuration from a JSON file (applied over --preset)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the resolved configuration to a JSON file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Save the resolved configuration as a user preset under this name
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// Delete a user preset and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,

    /// List available presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,

    // === Output ===
    /// Nucleus coordinate file (tab-separated x, y per line)
    #[arg(short = 'o', long, default_value = "nucleus.txt")]
    output: PathBuf,

    /// Scatter plot of the finished nucleus (PNG)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long = "plot-width", default_value = "800")]
    plot_width: u32,

    /// Animated GIF of the growth
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Record a GIF frame every N attached cells
    #[arg(long = "gif-every", default_value = "50")]
    gif_every: usize,

    /// GIF width in pixels
    #[arg(long = "gif-width", default_value = "320")]
    gif_width: u32,

    /// Print a Braille preview of the nucleus to the terminal
    #[arg(long)]
    preview: bool,

    /// Preview width in terminal columns
    #[arg(long = "preview-width", default_value = "80")]
    preview_width: usize,
}

/// Defaults, then preset, then config file, then explicit flags
fn resolve_config(args: &Args, presets: &PresetManager) -> Result<SnowflakeConfig, String> {
    let mut config = match &args.preset {
        Some(name) => {
            let preset = presets.find(name).ok_or_else(|| {
                format!(
                    "unknown preset {:?} (available: {})",
                    name,
                    presets.preset_names().join(", ")
                )
            })?;
            debug!("Using preset {:?}", preset.name);
            preset.config.clone()
        }
        None => SnowflakeConfig::default(),
    };

    if let Some(path) = &args.config {
        config = SnowflakeConfig::load_from_file(path).map_err(|e| e.to_string())?;
        debug!("Loaded configuration from {}", path.display());
    }

    if let Some(mesh_length) = args.mesh_length {
        config.mesh_length = mesh_length;
    }
    if let Some(limit) = args.nucleus_upper_limit {
        config.nucleus_upper_limit = limit;
    }
    if let Some(wind_level) = args.wind_level {
        config.wind_level = wind_level;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut presets = PresetManager::new();
    if let Some(name) = &args.delete_preset {
        presets.delete_preset(name)?;
        info!("Deleted preset {:?}", name);
        return Ok(());
    }
    if args.list_presets {
        for preset in presets.all_presets() {
            let c = &preset.config;
            println!(
                "{:<12} mesh_length={:<4} limit={:<6} wind={:.4}  {}",
                preset.name, c.mesh_length, c.nucleus_upper_limit, c.wind_level, preset.description
            );
        }
        return Ok(());
    }

    let config = resolve_config(&args, &presets)?;
    debug!("Resolved configuration: {:?}", config);

    // Configuration errors are fatal before any growth starts
    let mut engine = GrowthEngine::new(&config)?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("Saved configuration to {}", path.display());
    }
    if let Some(name) = &args.save_preset {
        presets.save_preset(Preset {
            name: name.clone(),
            description: String::from("Saved from the command line"),
            config: config.clone(),
        })?;
        info!("Saved preset {:?}", name);
    }

    let time_start = Instant::now();
    let mut recorder = args
        .gif
        .as_deref()
        .map(|path| {
            GrowthRecorder::create(path, config.mesh_length, args.gif_every, args.gif_width)
        })
        .transpose()?;
    match recorder.as_mut() {
        Some(recorder) => {
            recorder.capture(engine.lattice());
            engine.run_with(|lattice| recorder.observe(lattice));
        }
        None => engine.run(),
    }
    let stats = engine.stats();
    info!(
        "Time elapsed: {:.3} s ({} walkers, {} escaped, {} spawn collisions, {} steps)",
        time_start.elapsed().as_secs_f64(),
        stats.walkers,
        stats.escaped,
        stats.spawn_collisions,
        stats.steps
    );

    export::write_nucleus(&args.output, engine.lattice())?;
    info!(
        "Wrote {} nucleus cells to {}",
        engine.lattice().frozen_count(),
        args.output.display()
    );

    if let Some(path) = &args.plot {
        let points = export::read_nucleus(&args.output)?;
        plot::save_plot(&points, config.mesh_length, args.plot_width, path)?;
        info!("Saved plot to {}", path.display());
    }

    if let (Some(path), Some(mut recorder)) = (&args.gif, recorder) {
        recorder.capture(engine.lattice());
        let frames = recorder.finish()?;
        info!("Saved {} frame animation to {}", frames, path.display());
    }

    if args.preview {
        for line in braille::render_lattice(engine.lattice(), args.preview_width) {
            println!("{}", line);
        }
    }

    Ok(())
}
