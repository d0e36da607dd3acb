//! phi - Command line front end for the golden-ratio geometry kernel
//!
//! Every subcommand is a single kernel query. Results go to stdout as
//! plain text, or as JSON with `--json`. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phi_kernel::{Coordinate, GoldenKernel, Plane};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phi")]
#[command(about = "Golden-ratio geometry kernel: Fibonacci, spirals, rotations, bins and anchors")]
#[command(version)]
struct Cli {
    /// Config file (.json, .yaml or .yml); defaults to the user config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exact Fibonacci number F(n)
    Fib {
        #[arg(allow_hyphen_values = true)]
        n: i64,
    },

    /// Fibonacci numbers F(start) through F(end)
    FibRange {
        #[arg(allow_hyphen_values = true)]
        start: i64,
        #[arg(allow_hyphen_values = true)]
        end: i64,
    },

    /// Index of a Fibonacci number
    FibIndex {
        #[arg(allow_hyphen_values = true)]
        value: i128,
    },

    /// Binet closed-form approximation of F(n)
    Binet {
        #[arg(allow_hyphen_values = true)]
        n: i64,
    },

    /// Exponential bin index of a positive value
    Bin {
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },

    /// All bins overlapping [min, max]
    Bins {
        #[arg(allow_hyphen_values = true)]
        min: f64,
        #[arg(allow_hyphen_values = true)]
        max: f64,
    },

    /// Value range [φ^i, φ^(i+1)) and center of bin i
    BinRange {
        #[arg(allow_hyphen_values = true)]
        index: i32,
    },

    /// Golden spiral queries
    Spiral {
        #[command(subcommand)]
        command: SpiralCommands,
    },

    /// Spiral distance between two coordinates
    Distance {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    /// Rotate a coordinate by whole golden-angle steps
    Rotate {
        #[arg(allow_hyphen_values = true)]
        coord: String,
        #[arg(allow_hyphen_values = true)]
        steps: i64,
        /// Rotation plane: xy, xz, xw, yz, yw, zw (or 12, 13, ...)
        #[arg(long, default_value = "xy")]
        plane: String,
    },

    /// Golden-angle distribution of points on a circle
    Distribute {
        #[arg(allow_hyphen_values = true)]
        center: String,
        #[arg(allow_hyphen_values = true)]
        radius: f64,
        count: usize,
        #[arg(long, default_value = "xy")]
        plane: String,
    },

    /// Nearest anchor to a coordinate
    Nearest {
        #[arg(allow_hyphen_values = true)]
        coord: String,
        /// Rank this many anchors instead of just the closest
        #[arg(short = 'k', long)]
        count: Option<usize>,
    },

    /// Pentagonal cluster of an anchor
    Cluster { id: usize },

    /// List all twelve anchors
    Anchors,
}

#[derive(Subcommand)]
enum SpiralCommands {
    /// Radius at angle θ (radians)
    Radius {
        #[arg(allow_hyphen_values = true)]
        angle: f64,
    },

    /// Angle (radians) at which the spiral reaches radius r
    Angle {
        #[arg(allow_hyphen_values = true)]
        radius: f64,
    },

    /// Evenly spaced points along the spiral
    Path {
        #[arg(allow_hyphen_values = true)]
        start: f64,
        #[arg(allow_hyphen_values = true)]
        end: f64,
        points: usize,
    },
}

#[derive(Serialize)]
struct FibOutput {
    n: i64,
    value: u128,
}

#[derive(Serialize)]
struct BinRangeOutput {
    index: i32,
    lower: f64,
    upper: f64,
    center: f64,
}

#[derive(Serialize)]
struct AnchorOutput {
    id: usize,
    coordinate: Coordinate,
}

/// Parse "x,y,z,w" into a validated coordinate
fn parse_coordinate(text: &str) -> Result<Coordinate> {
    let values = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid coordinate component '{}'", part.trim()))
        })
        .collect::<Result<Vec<f64>>>()?;

    Coordinate::from_slice(&values).with_context(|| format!("invalid coordinate '{}'", text))
}

fn parse_plane(text: &str) -> Result<Plane> {
    text.parse::<Plane>().context("invalid --plane")
}

/// Print `value` as JSON, or the text rendering otherwise
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "phi_kernel={level},phi_config={level},phi={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = phi_config::load_or_default(cli.config.as_deref())
        .context("failed to load kernel config")?;
    let kernel = GoldenKernel::from_config(&config)?;
    tracing::debug!(json = cli.json, "kernel ready");

    run(&kernel, cli.command, cli.json)
}

fn run(kernel: &GoldenKernel, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Fib { n } => {
            let value = kernel.fibonacci.get(n)?;
            emit(json, &FibOutput { n, value }, || value.to_string())
        }
        Commands::FibRange { start, end } => {
            let values = kernel.fibonacci.get_range(start, end)?;
            emit(json, &values, || {
                values
                    .iter()
                    .map(u128::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
        }
        Commands::FibIndex { value } => {
            let index = kernel.fibonacci.find_index_for_value(value)?;
            emit(json, &index, || index.to_string())
        }
        Commands::Binet { n } => {
            let value = kernel.fibonacci.approximate_with_phi(n)?;
            emit(json, &FibOutput { n, value }, || value.to_string())
        }
        Commands::Bin { value } => {
            let index = kernel.binner.get_bin(value)?;
            emit(json, &index, || index.to_string())
        }
        Commands::Bins { min, max } => {
            let bins = kernel.binner.bins_in_range(min, max)?;
            emit(json, &bins, || {
                bins.iter().map(i32::to_string).collect::<Vec<_>>().join(" ")
            })
        }
        Commands::BinRange { index } => {
            let (lower, upper) = kernel.binner.get_bin_range(index);
            let out = BinRangeOutput {
                index,
                lower,
                upper,
                center: kernel.binner.get_bin_center(index),
            };
            emit(json, &out, || {
                format!("[{}, {}) center {}", out.lower, out.upper, out.center)
            })
        }
        Commands::Spiral { command } => run_spiral(kernel, command, json),
        Commands::Distance { a, b } => {
            let a = parse_coordinate(&a)?;
            let b = parse_coordinate(&b)?;
            let distance = kernel.spiral.distance_4d(&a, &b);
            emit(json, &distance, || distance.to_string())
        }
        Commands::Rotate { coord, steps, plane } => {
            let coord = parse_coordinate(&coord)?;
            let rotated = kernel.rotator.rotate_4d(&coord, steps, parse_plane(&plane)?)?;
            emit(json, &rotated, || rotated.to_string())
        }
        Commands::Distribute {
            center,
            radius,
            count,
            plane,
        } => {
            let center = parse_coordinate(&center)?;
            let points = kernel.rotator.generate_distribution_in_plane(
                &center,
                radius,
                count,
                parse_plane(&plane)?,
            )?;
            emit(json, &points, || {
                points
                    .iter()
                    .map(Coordinate::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Nearest { coord, count } => {
            let coord = parse_coordinate(&coord)?;
            match count {
                Some(k) => {
                    let ranked = kernel.anchors.nearest_anchors(&coord, k);
                    emit(json, &ranked, || {
                        ranked
                            .iter()
                            .map(|m| format!("{} {}", m.id, m.distance))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                }
                None => {
                    let best = kernel.anchors.nearest_anchor(&coord);
                    emit(json, &best, || format!("{} {}", best.id, best.distance))
                }
            }
        }
        Commands::Cluster { id } => {
            let cluster = kernel.anchors.get_pentagonal_cluster(id)?;
            emit(json, &cluster, || {
                cluster
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
        }
        Commands::Anchors => {
            let anchors: Vec<AnchorOutput> = kernel
                .anchors
                .anchors()
                .map(|(id, c)| AnchorOutput {
                    id,
                    coordinate: *c,
                })
                .collect();
            emit(json, &anchors, || {
                anchors
                    .iter()
                    .map(|a| format!("{:>2} {}", a.id, a.coordinate))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

fn run_spiral(kernel: &GoldenKernel, command: SpiralCommands, json: bool) -> Result<()> {
    match command {
        SpiralCommands::Radius { angle } => {
            let radius = kernel.spiral.radius_at_angle(angle);
            emit(json, &radius, || radius.to_string())
        }
        SpiralCommands::Angle { radius } => {
            let angle = kernel.spiral.angle_at_radius(radius)?;
            emit(json, &angle, || angle.to_string())
        }
        SpiralCommands::Path { start, end, points } => {
            let path = kernel.spiral.spiral_path_points(start, end, points)?;
            emit(json, &path, || {
                path.iter()
                    .map(|p| {
                        let (x, y) = p.to_cartesian();
                        format!("r={} θ={} ({}, {})", p.radius, p.angle, x, y)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}
