//! Flick CLI
//!
//! Run canvas animations headlessly on a paced frame loop.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flick_animation::{AnimationOptions, ControllerConfig, ControllerRegistry};
use flick_paint::{ContextType, RecordingContext, Size};
use flick_platform::{FrameLoop, Host};

mod config;
mod demos;

use config::FlickConfig;
use demos::Demo;

#[derive(Parser)]
#[command(name = "flick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flick canvas animation runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a demo animation
    Run {
        /// Config file (defaults to ./flick.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Demo to draw
        #[arg(short, long, value_enum)]
        demo: Option<Demo>,

        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Stop once local time reaches this many seconds
        #[arg(long)]
        seconds: Option<f64>,

        /// Local time of the first frame
        #[arg(long)]
        offset: Option<f64>,

        /// Background color ("", "transparent", or a CSS color)
        #[arg(long)]
        background: Option<String>,

        /// Pause instead of stopping when a limit is reached
        #[arg(long)]
        pause_on_limit: bool,

        /// Print the final controller snapshot as JSON
        #[arg(long)]
        dump_state: bool,
    },

    /// Parse a config file and print the effective configuration
    CheckConfig {
        /// Config file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            config,
            demo,
            fps,
            frames,
            seconds,
            offset,
            background,
            pause_on_limit,
            dump_state,
        } => {
            let mut file = FlickConfig::load_or_default(config.as_deref())?;

            let mut overrides = AnimationOptions::new();
            if let Some(frames) = frames {
                overrides = overrides.frame_count_limit(frames as f64);
            }
            if let Some(seconds) = seconds {
                overrides = overrides.local_time_limit_seconds(seconds);
            }
            if let Some(offset) = offset {
                overrides = overrides.time_offset_seconds(offset);
            }
            if let Some(background) = background {
                overrides = overrides.background_color(background);
            }
            if pause_on_limit {
                overrides = overrides.pause_on_limit(true);
            }
            file.animation = std::mem::take(&mut file.animation).merge(overrides);

            if let Some(demo) = demo {
                file.run.demo = demo.name().to_string();
            }
            if let Some(fps) = fps {
                file.run.fps = fps;
            }

            cmd_run(&file, dump_state)
        }

        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn cmd_run(config: &FlickConfig, dump_state: bool) -> Result<()> {
    let context_type = ContextType::parse(&config.surface.context_type)
        .with_context(|| format!("Invalid context type '{}'", config.surface.context_type))?;
    let demo = Demo::parse(&config.run.demo)
        .with_context(|| format!("Unknown demo '{}'", config.run.demo))?;

    let frame_loop = FrameLoop::new();
    let mut registry = ControllerRegistry::<RecordingContext>::new(Host::system(&frame_loop));
    let surface = registry.create_surface(
        Some("stage"),
        Size::new(config.surface.width, config.surface.height),
    )?;

    let recorded = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&recorded);
    let controller = registry.create(
        &surface,
        ControllerConfig::new()
            .context_type(context_type)
            .options(config.animation.clone())
            .on_frame(move |info, ctx, t| {
                demo.draw(info, ctx, t);
                counter.set(counter.get() + ctx.take_commands().len());
            }),
    )?;

    if controller.is_running() && config.animation.frame_count_limit.is_none() {
        let bounded = config.animation.local_time_limit_seconds.is_some()
            || config.animation.wall_time_limit_seconds.is_some()
            || config.run.max_seconds.is_some();
        if !bounded {
            warn!("No frame or time limit set; the animation runs until interrupted");
        }
    }

    let max_duration = config
        .run
        .max_seconds
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(Duration::from_secs_f64);

    info!(
        "Running {} on a {}x{} {} surface at {} fps",
        demo.name(),
        config.surface.width,
        config.surface.height,
        context_type,
        config.run.fps
    );

    let ticks = frame_loop
        .run(config.run.fps, max_duration)
        .context("Frame loop failed")?;

    if controller.is_running() {
        // The loop hit its duration cap while frames were still flowing
        controller.stop(false);
    }

    println!("Demo:            {}", demo.name());
    println!("Host ticks:      {}", ticks);
    println!("Frames drawn:    {}", controller.drawn_frames_count());
    println!("Last local time: {:.3}s", controller.last_local_time());
    println!("Commands:        {}", recorded.get());
    println!("Final state:     {:?}", controller.lifecycle());

    if dump_state {
        let json = serde_json::to_string_pretty(&controller.snapshot())
            .context("Failed to serialize controller snapshot")?;
        println!("{}", json);
    }

    Ok(())
}

fn cmd_check_config(path: &Path) -> Result<()> {
    let config = FlickConfig::load(path)?;

    info!("Checking {}", path.display());

    if ContextType::parse(&config.surface.context_type).is_none() {
        anyhow::bail!(
            "Invalid context type '{}'. Valid types: 2d, webgl, 3d",
            config.surface.context_type
        );
    }
    if Demo::parse(&config.run.demo).is_none() {
        anyhow::bail!(
            "Unknown demo '{}'. Valid demos: spinning-hand, sine-field",
            config.run.demo
        );
    }
    if let Some(color) = &config.animation.background_color {
        if flick_paint::Background::parse(color).is_none() {
            warn!("backgroundColor '{}' is not a color and will be ignored", color);
        }
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
