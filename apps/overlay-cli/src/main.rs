use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use overlay_config::RenderConfig;
use overlay_display::WINDOWED_SIZE;
use overlay_projection::{
    CameraFrame, FOV_MAX, FOV_MIN, Projector, VISIBILITY_MARGIN, ViewportFrame,
};
use overlay_render::{FrameReport, FrameSignal, Overlay, RecordingCanvas, SKELETON_SEGMENTS};
use overlay_tools::SnapshotInspector;
use overlay_world::{
    Entity, EntityKind, ExitPoint, ExitStatus, Joint, JointMap, LootItem, Observer, WorldSnapshot,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "overlay-cli", about = "CLI tool for the overlay core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and projection constants
    Info,
    /// Render a snapshot file and print the draw commands
    Render {
        /// World snapshot (JSON)
        snapshot: PathBuf,
        /// Render configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "1920")]
        width: f32,
        #[arg(long, default_value = "1080")]
        height: f32,
        /// Render with the visibility toggle off
        #[arg(long)]
        hidden: bool,
    },
    /// Project one world point for a given pose
    Project {
        /// Yaw in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        yaw: f32,
        /// Pitch in degrees, positive looks down
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        /// Eye position as x,y,z
        #[arg(
            long,
            default_value = "0,1.65,0",
            value_parser = parse_vec3,
            allow_hyphen_values = true
        )]
        eye: Vec3,
        /// World point as x,y,z
        #[arg(value_parser = parse_vec3, allow_hyphen_values = true)]
        point: Vec3,
        #[arg(long, default_value = "1920")]
        width: f32,
        #[arg(long, default_value = "1080")]
        height: f32,
        #[arg(long, default_value = "55")]
        fov: f32,
    },
    /// Summarise a snapshot file
    Inspect {
        snapshot: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Render a synthetic scene through a frame signal
    Demo {
        /// Number of frame notifications to send
        #[arg(short, long, default_value = "5")]
        ticks: u32,
        #[arg(long, default_value = "1280")]
        width: f32,
        #[arg(long, default_value = "720")]
        height: f32,
        /// Print the draw commands of the last frame
        #[arg(long)]
        dump: bool,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got {s:?}"));
    };
    let num = |v: &str| v.parse::<f32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Vec3::new(num(x)?, num(y)?, num(z)?))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<WorldSnapshot> {
    WorldSnapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}

fn print_report(report: &FrameReport) {
    println!(
        "mode={:?} entities={} skipped={} out_of_range={} loot={} (labels={}) exits={} faults={}",
        report.mode,
        report.entities_drawn,
        report.entities_skipped,
        report.entities_out_of_range,
        report.loot_markers,
        report.loot_labels,
        report.exits_drawn,
        report.item_faults
    );
    if let Some(fault) = &report.fault {
        println!("frame fault: {fault}");
    }
    if let Some(p) = &report.placement {
        println!("placement: {}x{} at ({}, {})", p.width, p.height, p.x, p.y);
    }
}

/// A standing figure at `base` (feet), facing +Z.
fn standing_figure(base: Vec3) -> JointMap {
    let offsets = [
        (Joint::Head, Vec3::new(0.0, 1.70, 0.0)),
        (Joint::Neck, Vec3::new(0.0, 1.55, 0.0)),
        (Joint::UpperSpine, Vec3::new(0.0, 1.35, 0.0)),
        (Joint::LowerSpine, Vec3::new(0.0, 1.10, 0.0)),
        (Joint::Pelvis, Vec3::new(0.0, 0.95, 0.0)),
        (Joint::LeftUpperArm, Vec3::new(-0.20, 1.45, 0.0)),
        (Joint::LeftForearm, Vec3::new(-0.25, 1.20, 0.0)),
        (Joint::LeftForearmTwist, Vec3::new(-0.27, 1.05, 0.0)),
        (Joint::LeftHand, Vec3::new(-0.28, 0.90, 0.0)),
        (Joint::RightUpperArm, Vec3::new(0.20, 1.45, 0.0)),
        (Joint::RightForearm, Vec3::new(0.25, 1.20, 0.0)),
        (Joint::RightForearmTwist, Vec3::new(0.27, 1.05, 0.0)),
        (Joint::RightHand, Vec3::new(0.28, 0.90, 0.0)),
        (Joint::LeftUpperThigh, Vec3::new(-0.10, 0.90, 0.0)),
        (Joint::LeftLowerThigh, Vec3::new(-0.11, 0.65, 0.0)),
        (Joint::LeftCalf, Vec3::new(-0.12, 0.45, 0.0)),
        (Joint::LeftFoot, Vec3::new(-0.12, 0.05, 0.0)),
        (Joint::RightUpperThigh, Vec3::new(0.10, 0.90, 0.0)),
        (Joint::RightLowerThigh, Vec3::new(0.11, 0.65, 0.0)),
        (Joint::RightCalf, Vec3::new(0.12, 0.45, 0.0)),
        (Joint::RightFoot, Vec3::new(0.12, 0.05, 0.0)),
    ];
    offsets.into_iter().map(|(j, o)| (j, base + o)).collect()
}

fn demo_scene() -> WorldSnapshot {
    let kinds = [
        (EntityKind::Pmc, "Hostile"),
        (EntityKind::Teammate, "Buddy"),
        (EntityKind::AiScav, "Scav"),
        (EntityKind::AiBoss, "Boss"),
        (EntityKind::PlayerScav, "PScav"),
    ];
    let entities = kinds
        .iter()
        .enumerate()
        .map(|(i, (kind, name))| {
            let base = Vec3::new(i as f32 * 3.0 - 6.0, 0.0, 15.0 + i as f32 * 10.0);
            Entity::new(*kind, base)
                .named(*name)
                .with_joints(standing_figure(base))
        })
        .collect();

    let mut snapshot = WorldSnapshot::active(Observer::new(Vec3::ZERO, 0.0, 0.0));
    snapshot.entities = Some(entities);
    snapshot.loot = Some(vec![
        LootItem::new("GPU", Vec3::new(0.5, 0.3, 6.0), 320_000),
        LootItem::new("Keycard", Vec3::new(-3.0, 0.8, 8.0), 1_400_000).important(),
    ]);
    snapshot.exits = Some(vec![
        ExitPoint::new("Gate", Vec3::new(10.0, 1.0, 120.0), ExitStatus::Open),
        ExitPoint::new("Tunnel", Vec3::new(-20.0, 0.0, 90.0), ExitStatus::Pending),
        ExitPoint::new("Bunker", Vec3::new(0.0, 0.0, 60.0), ExitStatus::Closed),
    ]);
    snapshot
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("overlay-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("projection: fov {FOV_MIN}..{FOV_MAX}, margin {VISIBILITY_MARGIN}px");
            println!("skeleton: {} segments", SKELETON_SEGMENTS.len());
            println!("display: windowed {}x{}", WINDOWED_SIZE.0, WINDOWED_SIZE.1);
        }
        Commands::Render {
            snapshot,
            config,
            width,
            height,
            hidden,
        } => {
            let config = load_config(config.as_deref())?;
            let snapshot = load_snapshot(&snapshot)?;

            let mut overlay = Overlay::new((width as u32, height as u32));
            if hidden {
                overlay.toggle_visibility();
            }
            let mut canvas = RecordingCanvas::new();
            let report = overlay.render_frame(&mut canvas, width, height, &snapshot, &config);
            print!("{}", canvas.dump());
            print_report(&report);
        }
        Commands::Project {
            yaw,
            pitch,
            eye,
            point,
            width,
            height,
            fov,
        } => {
            let frame = CameraFrame::from_angles(yaw, pitch, eye)?;
            let viewport = ViewportFrame::new(width, height, fov);
            viewport.validate()?;
            let projector = Projector::new(frame, viewport);
            println!(
                "forward=({:.3}, {:.3}, {:.3}) depth={:.3} fov={}",
                frame.forward.x,
                frame.forward.y,
                frame.forward.z,
                projector.depth(point),
                viewport.fov
            );
            match projector.project_checked(point) {
                Ok(s) => println!("screen=({:.1}, {:.1})", s.x, s.y),
                Err(reason) => println!("rejected: {reason}"),
            }
        }
        Commands::Inspect { snapshot, config } => {
            let config = load_config(config.as_deref())?;
            let snapshot = load_snapshot(&snapshot)?;
            print!("{}", SnapshotInspector::summary(&snapshot, &config));
            for id in SnapshotInspector::list_entities(&snapshot) {
                if let Some(info) = SnapshotInspector::inspect_entity(&snapshot, id) {
                    println!("{info}");
                }
            }
        }
        Commands::Demo {
            ticks,
            width,
            height,
            dump,
        } => {
            if ticks == 0 {
                bail!("demo needs at least one tick");
            }
            let config = RenderConfig {
                esp_loot: true,
                esp_loot_price: true,
                esp_crosshair: true,
                esp_show_fps: true,
                ..RenderConfig::default()
            };
            let scene = Rc::new(RefCell::new(demo_scene()));
            let canvas = Rc::new(RefCell::new(RecordingCanvas::new()));
            let overlay = Rc::new(RefCell::new(Overlay::new((width as u32, height as u32))));

            let signal = FrameSignal::new();
            let subscription = {
                let (scene, canvas, overlay) = (scene.clone(), canvas.clone(), overlay.clone());
                signal.subscribe(move || {
                    let mut canvas = canvas.borrow_mut();
                    let report = overlay.borrow_mut().render_frame(
                        &mut *canvas,
                        width,
                        height,
                        &scene.borrow(),
                        &config,
                    );
                    print_report(&report);
                })
            };

            for tick in 0..ticks {
                // Sweep the view a few degrees each frame.
                if let Some(observer) = scene.borrow_mut().observer.as_mut() {
                    observer.yaw = tick as f32 * 3.0 - 6.0;
                }
                signal.notify();
            }
            drop(subscription);
            tracing::info!(subscribers = signal.subscriber_count(), "demo finished");

            let overlay = overlay.borrow();
            let times = overlay.compositor().frame_times();
            println!(
                "fps={} frame time avg={:?} min={:?} max={:?} over {} intervals",
                overlay.compositor().fps(),
                times.average(),
                times.min(),
                times.max(),
                times.count()
            );

            if dump {
                print!("{}", canvas.borrow().dump());
            }
        }
    }

    Ok(())
}
