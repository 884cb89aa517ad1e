//! Command line driver for the linear transformation playground.
//!
//! Builds one transformation (or the whole gallery of five), renders the
//! original and transformed vector spaces side by side and saves the picture
//! as a BMP. A JSON dump of the same data can be written for other plotting
//! tools. The `vectors`, `projectile` and `spring-block` commands only write
//! JSON.

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lintrans::export::{TransformSnapshot, VectorReport};
use lintrans::library::Vector3;
use lintrans::projectile::Launch;
use lintrans::spring_block::Collision;
use lintrans::{Transform2D, TransformConfig, TransformKind, VectorSpaceKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Points per gallery picture, same density as the classroom figures
const GALLERY_POINTS: usize = 1800;
/// Directory the gallery pictures land in
const GALLERY_DIR: &str = "figures";

#[derive(Debug, Parser)]
#[command(name = "lintrans", version, about = "Visualize 2D linear transformations")]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a single transformation
    Transform(TransformArgs),
    /// Render every transformation kind into one directory
    Gallery {
        #[arg(long, default_value = "rectangular", value_parser = parse_space)]
        space: VectorSpaceKind,
        #[arg(short, default_value_t = GALLERY_POINTS)]
        n: usize,
        #[arg(long, default_value = GALLERY_DIR)]
        out_dir: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Dot and cross product of two 3D vectors, written as JSON
    Vectors {
        #[arg(long, value_parser = parse_vector3, allow_hyphen_values = true)]
        a: Vector3,
        #[arg(long, value_parser = parse_vector3, allow_hyphen_values = true)]
        b: Vector3,
        #[arg(long, default_value = "vector_data.json")]
        out: PathBuf,
    },
    /// Sample a projectile from launch to impact, written as JSON
    Projectile(ProjectileArgs),
    /// Inelastic hit on a block held by a spring, oscillation written as JSON
    SpringBlock(SpringBlockArgs),
}

#[derive(Debug, clap::Args)]
struct ProjectileArgs {
    /// Launch speed in m/s
    #[arg(long)]
    speed: Option<f64>,
    /// Launch angle in radians
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<f64>,
    /// Launch height above the ground in metres
    #[arg(long)]
    height: Option<f64>,
    /// Downward acceleration in m/s²
    #[arg(long)]
    gravity: Option<f64>,
    #[arg(long)]
    mass: Option<f64>,
    #[arg(long)]
    samples: Option<usize>,
    #[arg(long, default_value = "projectile_motion_data.json")]
    out: PathBuf,
}

impl ProjectileArgs {
    fn launch(&self) -> Launch {
        let mut launch = Launch::default();
        if let Some(speed) = self.speed {
            launch.speed = speed;
        }
        if let Some(angle) = self.angle {
            launch.angle = angle;
        }
        if let Some(height) = self.height {
            launch.origin[1] = height;
        }
        if let Some(gravity) = self.gravity {
            launch.acceleration[1] = -gravity;
        }
        if let Some(mass) = self.mass {
            launch.mass = mass;
        }
        if let Some(samples) = self.samples {
            launch.samples = samples;
        }
        launch
    }
}

#[derive(Debug, clap::Args)]
struct SpringBlockArgs {
    #[arg(long)]
    projectile_mass: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    projectile_velocity: Option<f64>,
    #[arg(long)]
    block_mass: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    block_velocity: Option<f64>,
    /// Spring constant in N/m
    #[arg(short, long)]
    k: Option<f64>,
    #[arg(long)]
    cycles: Option<usize>,
    #[arg(long)]
    samples_per_cycle: Option<usize>,
    #[arg(long, default_value = "json_data/collision_in_mass_spring.json")]
    out: PathBuf,
}

impl SpringBlockArgs {
    fn collision(&self) -> Collision {
        let defaults = Collision::default();
        Collision {
            projectile_mass: self.projectile_mass.unwrap_or(defaults.projectile_mass),
            projectile_velocity: self.projectile_velocity.unwrap_or(defaults.projectile_velocity),
            block_mass: self.block_mass.unwrap_or(defaults.block_mass),
            block_velocity: self.block_velocity.unwrap_or(defaults.block_velocity),
            spring_constant: self.k.unwrap_or(defaults.spring_constant),
            cycles: self.cycles.unwrap_or(defaults.cycles),
            samples_per_cycle: self.samples_per_cycle.unwrap_or(defaults.samples_per_cycle),
        }
    }
}

#[derive(Debug, clap::Args)]
struct TransformArgs {
    /// TOML file with kind, vector space, point count and parameters
    #[arg(long)]
    config: Option<PathBuf>,
    /// rotation, scaling, shearing, reflection or collapse
    #[arg(long, value_parser = parse_kind)]
    kind: Option<TransformKind>,
    /// rectangular or circular
    #[arg(long, value_parser = parse_space)]
    space: Option<VectorSpaceKind>,
    #[arg(short)]
    n: Option<usize>,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Override a parameter, e.g. `--param rotation.angle=1.57`
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String, f64)>,
    /// Also write the points and matrix as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn parse_kind(s: &str) -> Result<TransformKind, String> {
    s.parse().map_err(|e: lintrans::TransformError| e.to_string())
}

fn parse_space(s: &str) -> Result<VectorSpaceKind, String> {
    s.parse().map_err(|e: lintrans::TransformError| e.to_string())
}

fn parse_vector3(s: &str) -> Result<Vector3, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <Vector3>::try_from(values).map_err(|v| format!("expected 3 components, got {}", v.len()))
}

fn parse_param(s: &str) -> Result<(String, String, f64), String> {
    let (path, value) = s.split_once('=').ok_or("expected KIND.NAME=VALUE")?;
    let (kind, name) = path.split_once('.').ok_or("expected KIND.NAME=VALUE")?;
    let value = value.trim().parse::<f64>().map_err(|e| format!("'{value}': {e}"))?;
    Ok((kind.trim().to_string(), name.trim().to_string(), value))
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Merges the config file (if any) with the command line flags, flags winning.
///
/// # Arguments
///
/// * `args` - Parsed `transform` subcommand flags
fn resolve_config(args: &TransformArgs) -> Result<TransformConfig> {
    let mut config = match (&args.config, args.kind) {
        (Some(path), _) => TransformConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        (None, Some(kind)) => TransformConfig::new(kind, VectorSpaceKind::Rectangular),
        (None, None) => bail!("either --kind or --config is required"),
    };
    if let Some(kind) = args.kind {
        config.kind = kind;
    }
    if let Some(space) = args.space {
        config.vector_space = space;
    }
    if let Some(n) = args.n {
        config.n = n;
    }
    if let Some(out) = &args.out {
        config.output = out.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    for (kind, name, value) in &args.params {
        config = config.with_param(kind, name, *value);
    }
    Ok(config)
}

/// Renders one transform to its configured output path.
///
/// # Arguments
///
/// * `transform` - The built transformation
/// * `json` - Optional path for the JSON snapshot
fn publish(transform: &Transform2D, json: Option<&Path>) -> Result<()> {
    let output = transform.output();
    render::render_to_file(transform, output)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("failed to render {}", output.display()))?;

    println!("{} Transformation", transform.kind().title());
    println!("Vector space: {}", transform.vector_space());
    println!("Matrix:\n{}", transform.matrix());
    println!("Determinant: {:.3}", transform.determinant());
    println!("Image saved as: {}", output.display());

    if let Some(path) = json {
        TransformSnapshot::from_transform(transform)
            .write_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Transform(args) => {
            let config = resolve_config(&args)?;
            let transform = Transform2D::new(config)?;
            publish(&transform, args.json.as_deref())
        }
        Command::Gallery {
            space,
            n,
            out_dir,
            seed,
        } => {
            for kind in TransformKind::ALL {
                let mut config = TransformConfig::new(kind, space)
                    .with_points(n)
                    .with_output(out_dir.join(format!("{kind}.bmp")));
                config.seed = seed;
                let transform = Transform2D::new(config)?;
                publish(&transform, None)?;
                info!(
                    source = transform.source().len(),
                    image = transform.image().len(),
                    "{} done",
                    kind.title()
                );
            }
            Ok(())
        }
        Command::Vectors { a, b, out } => {
            let report = VectorReport::new(a, b)?;
            println!("Length of vector a: {}", report.length_a);
            println!("Length of vector b: {}", report.length_b);
            println!(
                "Dot product: {}, Angle (radians): {}",
                report.dot_product, report.angle
            );
            println!("Cross product: {:?}", report.cross_product);
            report
                .write_json(&out)
                .with_context(|| format!("failed to write {}", out.display()))
        }
        Command::Projectile(args) => {
            let flight = args.launch().simulate()?;
            let summary = flight.metadata;
            println!("Total flight time: {:.3} s", summary.total_time);
            println!("Maximum height: {:.3} m", summary.h_max);
            println!("Apogee time: {:.3} s", summary.apogee_time);
            println!("Initial energy: {:.3} J", summary.energy_initial);
            println!("Final energy: {:.3} J", summary.energy_final);
            println!("Impact angle: {:.3} degrees", summary.impact_angle);
            flight
                .write_json(&args.out)
                .with_context(|| format!("failed to write {}", args.out.display()))
        }
        Command::SpringBlock(args) => {
            let run = args.collision().simulate()?;
            let info = run.system_info;
            println!("Velocity after collision: {:.3} m/s", info.velocity_at_collision);
            println!("Amplitude: {:.3} m", info.amplitude);
            println!("Angular frequency: {:.3} rad/s", info.w);
            println!("Frequency: {:.3} Hz", info.frequency);
            println!("Period: {:.3} s", info.period);
            println!("Total mass: {:.3} kg", info.mass);
            println!("Samples: {}", run.oscillation_info.time.len());
            run.write_json(&args.out)
                .with_context(|| format!("failed to write {}", args.out.display()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vector_components() {
        assert_eq!(parse_vector3("1, 2,-3").unwrap(), [1.0, 2.0, -3.0]);
        assert!(parse_vector3("1,2").is_err());
        assert!(parse_vector3("1,x,3").is_err());
    }

    #[test]
    fn parses_param_overrides() {
        assert_eq!(
            parse_param("rotation.angle=1.5").unwrap(),
            ("rotation".to_string(), "angle".to_string(), 1.5)
        );
        assert!(parse_param("rotation=1.5").is_err());
        assert!(parse_param("rotation.angle").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "lintrans",
            "transform",
            "--kind",
            "scaling",
            "--space",
            "circular",
            "-n",
            "12",
            "--param",
            "scaling.scale_x=4",
        ])
        .unwrap();
        let Command::Transform(args) = cli.command else {
            panic!("expected transform subcommand");
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.kind, TransformKind::Scaling);
        assert_eq!(config.vector_space, VectorSpaceKind::Circular);
        assert_eq!(config.n, 12);
        assert_eq!(config.params["scaling"]["scale_x"], 4.0);
    }

    #[test]
    fn transform_needs_kind_or_config() {
        let cli = Cli::try_parse_from(["lintrans", "transform"]).unwrap();
        let Command::Transform(args) = cli.command else {
            panic!("expected transform subcommand");
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn projectile_flags_fill_in_the_launch() {
        let cli = Cli::try_parse_from([
            "lintrans",
            "projectile",
            "--speed",
            "12",
            "--angle",
            "-0.25",
            "--height",
            "3",
        ])
        .unwrap();
        let Command::Projectile(args) = cli.command else {
            panic!("expected projectile subcommand");
        };
        let launch = args.launch();
        assert_eq!(launch.speed, 12.0);
        assert_eq!(launch.angle, -0.25);
        assert_eq!(launch.origin, [0.0, 3.0]);
        assert_eq!(launch.mass, Launch::default().mass);
    }

    #[test]
    fn spring_block_defaults_match_library() {
        let cli = Cli::try_parse_from(["lintrans", "spring-block", "-k", "80"]).unwrap();
        let Command::SpringBlock(args) = cli.command else {
            panic!("expected spring-block subcommand");
        };
        let collision = args.collision();
        assert_eq!(collision.spring_constant, 80.0);
        assert_eq!(
            Collision {
                spring_constant: 50.0,
                ..collision
            },
            Collision::default()
        );
    }

    #[test]
    fn rejects_unknown_kind_name() {
        assert!(Cli::try_parse_from(["lintrans", "transform", "--kind", "shrink"]).is_err());
    }
}
