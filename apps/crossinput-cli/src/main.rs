use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossinput_common::names;
use crossinput_dispatch::{CrossPlatformInput, InputConfig, NullHardware, Platform};
use crossinput_producers::{
    AxisButtonConfig, AxisTouchButton, ControlLayout, Joystick, JoystickConfig, TouchControls,
};
use crossinput_tools::RegistryInspector;
use glam::Vec2;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crossinput-cli", about = "CLI tool for crossinput sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and platform defaults
    Info,
    /// Drag a simulated joystick and print the resulting axes
    Joystick {
        /// Horizontal pointer delta in pixels
        #[arg(long, default_value = "150", allow_negative_numbers = true)]
        dx: f32,
        /// Vertical pointer delta in pixels (y-down)
        #[arg(long, default_value = "-150", allow_negative_numbers = true)]
        dy: f32,
        /// Movement range in pixels
        #[arg(short, long, default_value = "100")]
        range: i32,
    },
    /// Hold then release a paired axis button and print the axis per frame
    Buttons {
        /// Frames to hold the positive button
        #[arg(long, default_value = "10")]
        hold: u32,
        /// Frames to run after release
        #[arg(long, default_value = "10")]
        release: u32,
        /// Frame time in seconds
        #[arg(long, default_value = "0.05")]
        dt: f32,
        /// Response speed in units per second
        #[arg(short, long, default_value = "3")]
        speed: f32,
    },
    /// Load a control layout, enable it and print the registry
    Layout {
        /// Layout file (.yaml, .yml or .json)
        path: PathBuf,
        /// Optional input config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also print the registry event log
        #[arg(short, long)]
        events: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let platform = Platform::current();
            println!("crossinput-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "platform: {platform:?}, default method: {:?}",
                platform.default_method()
            );
        }
        Commands::Joystick { dx, dy, range } => {
            let mut input = CrossPlatformInput::simulated();
            let mut controls = TouchControls::new();
            let id = controls.add_joystick(Joystick::new(JoystickConfig {
                movement_range: range,
                ..JoystickConfig::default()
            }));
            controls.enable_all(input.registry_mut());

            let stick = controls.joystick_mut(id)?;
            stick.on_pointer_down(Vec2::ZERO);
            stick.on_drag(Vec2::new(dx, dy));
            let handle = stick.position();
            println!("Drag ({dx}, {dy}) range={range}: handle=({}, {})", handle.x, handle.y);
            println!(
                "  horizontal={:+.3} vertical={:+.3}",
                input.get_axis(names::HORIZONTAL)?,
                input.get_axis(names::VERTICAL)?
            );

            controls.joystick_mut(id)?.on_pointer_up();
            println!(
                "Release: horizontal={:+.3} vertical={:+.3}",
                input.get_axis(names::HORIZONTAL)?,
                input.get_axis(names::VERTICAL)?
            );
            controls.disable_all(input.registry_mut());
        }
        Commands::Buttons {
            hold,
            release,
            dt,
            speed,
        } => {
            let mut input = CrossPlatformInput::simulated();
            let mut controls = TouchControls::new();
            let config = AxisButtonConfig {
                response_speed: speed,
                ..AxisButtonConfig::default()
            };
            let plus = controls.add_axis_button(AxisTouchButton::new(config.clone()));
            controls.add_axis_button(AxisTouchButton::new(AxisButtonConfig {
                axis_value: -1.0,
                ..config
            }));
            controls.enable_all(input.registry_mut());

            println!("Holding + for {hold} frames, dt={dt}, speed={speed}");
            controls.pointer_down(plus, dt)?;
            for frame in 0..hold + release {
                if frame == hold {
                    controls.pointer_up(plus, dt)?;
                    println!("Released");
                }
                controls.update(dt);
                println!(
                    "  frame {frame:>3}: {:+.3}",
                    input.get_axis(names::HORIZONTAL)?
                );
                input.end_frame();
            }
            controls.disable_all(input.registry_mut());
        }
        Commands::Layout {
            path,
            config,
            events,
        } => {
            let layout = ControlLayout::load(&path)
                .with_context(|| format!("loading layout {}", path.display()))?;
            let config = match config {
                Some(config) => InputConfig::load(&config)
                    .with_context(|| format!("loading config {}", config.display()))?,
                None => InputConfig::default(),
            };
            let mut input = CrossPlatformInput::new(&config, Rc::new(NullHardware));
            let mut controls = layout.build();
            println!(
                "Layout {}: {} controls, method {:?}",
                path.display(),
                controls.len(),
                input.active_method()
            );

            for (id, report) in controls.enable_all(input.registry_mut()) {
                let kind = controls.get(id).map_or("?", |c| c.kind());
                println!(
                    "  {kind} [{}] registered={:?} bound={:?}",
                    id.short(),
                    report.registered,
                    report.bound
                );
                for conflict in &report.conflicts {
                    println!("    conflict: {conflict}");
                }
            }

            println!("{}", RegistryInspector::summary(input.registry()));
            for cell in RegistryInspector::cells(input.registry()) {
                println!("  {cell}");
            }
            if events {
                for event in input.registry().events() {
                    println!("  event: {event:?}");
                }
            }
            controls.disable_all(input.registry_mut());
            tracing::debug!(
                axes = input.registry().axis_count(),
                buttons = input.registry().button_count(),
                "layout session closed"
            );
        }
    }

    Ok(())
}
