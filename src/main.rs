//! nbody-tools CLI
//!
//! # Commands
//!
//! - `generate` - Create random initial conditions for the n-body program
//! - `compare` - Check that two npy files are (almost) equal
//! - `plot` - Down-sample simulator output into scatter-plot points
//! - `inspect` - Summarize an initial-conditions file

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use nbody_tools::compare::{DEFAULT_ATOL, DEFAULT_RTOL};
use nbody_tools::export::{
    export_metadata, save_bodies_csv, write_scatter_csv, GenerationRecord,
};
use nbody_tools::trajectory::{
    cubic_limits, marker_sizes, PlotOptions, Trajectory, DEFAULT_MAX_POINTS,
};
use nbody_tools::{compare, generate, inspect, npy, BoundsArgs, Matrix, Tolerance};

#[derive(Parser)]
#[command(name = "nbody-tools")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a set of initial conditions for the n-body program
    ///
    /// Writes an n-by-7 matrix with the columns mass, x, y, z, vx, vy, vz.
    Generate {
        /// Number of bodies/particles to create
        n: usize,

        /// File to write the n-by-7 matrix to
        #[arg(value_name = "OUTPUT.npy")]
        output: PathBuf,

        #[command(flatten)]
        bounds: BoundsArgs,

        /// JSON file with the bounds, replaces the bound flags
        #[arg(long, value_name = "FILE.json")]
        config: Option<PathBuf>,

        /// Also write the bodies as CSV
        #[arg(long, value_name = "FILE.csv")]
        csv: Option<PathBuf>,

        /// Write a JSON record of how the file was generated
        #[arg(long, value_name = "FILE.json")]
        metadata: Option<PathBuf>,
    },
    /// Compares 2 npy files to make sure that they are (almost) equal
    ///
    /// Exits with 1 if the values differ and 2 if the shapes differ.
    Compare {
        /// First file to compare
        #[arg(value_name = "A.npy")]
        a: PathBuf,

        /// Second file to compare, the reference for relative differences
        #[arg(value_name = "B.npy")]
        b: PathBuf,

        /// Must be exactly equal instead of almost equal
        #[arg(long)]
        exact: bool,

        /// Relative tolerance for almost equal
        #[arg(long, default_value_t = DEFAULT_RTOL)]
        rtol: f64,

        /// Absolute tolerance for almost equal
        #[arg(long, default_value_t = DEFAULT_ATOL)]
        atol: f64,
    },
    /// Down-samples the output of the n-body program into scatter-plot points
    Plot {
        /// File with the output data to plot
        #[arg(value_name = "DATA.npy")]
        data: PathBuf,

        /// Maximum number of points to plot, spread evenly over the bodies
        #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
        max_points: usize,

        /// All bodies are plotted as the same size, regardless of mass
        #[arg(long)]
        same_size: bool,

        /// Draw in solid colors instead of gradients
        #[arg(long)]
        solid_color: bool,

        /// Initial conditions the data was simulated from, used for marker sizes
        #[arg(long, value_name = "INPUT.npy")]
        masses: Option<PathBuf>,

        /// Where to write the points as CSV (stdout if omitted)
        #[arg(short, long, value_name = "FILE.csv")]
        output: Option<PathBuf>,
    },
    /// Checks an initial-conditions file and prints a summary
    Inspect {
        /// Initial-conditions file to check
        #[arg(value_name = "INPUT.npy")]
        input: PathBuf,
    },
}

fn run(command: Commands) -> Result<u8> {
    match command {
        Commands::Generate {
            n,
            output,
            bounds,
            config,
            csv,
            metadata,
        } => {
            let bounds = match config {
                Some(path) => BoundsArgs::from_json_file(&path)
                    .with_context(|| format!("failed to read config {}", path.display()))?,
                None => bounds,
            };
            let config = bounds.resolve(n);
            config.validate()?;

            let bodies = generate(&config, &mut rand::rng());
            npy::save(&output, &Matrix::from_bodies(&bodies))
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("Wrote {} bodies to {}", bodies.len(), output.display());

            if let Some(path) = csv {
                save_bodies_csv(&path, &bodies)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            if let Some(path) = metadata {
                let record = GenerationRecord::new(&config, &bodies, &output);
                export_metadata(&path, &record)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            Ok(0)
        }
        Commands::Compare {
            a,
            b,
            exact,
            rtol,
            atol,
        } => {
            let left = npy::load(&a).with_context(|| format!("failed to load {}", a.display()))?;
            let right = npy::load(&b).with_context(|| format!("failed to load {}", b.display()))?;

            let result = compare(&left, &right, exact, Tolerance { rtol, atol });
            println!("{result}");
            Ok(result.exit_code())
        }
        Commands::Plot {
            data,
            max_points,
            same_size,
            solid_color,
            masses,
            output,
        } => {
            let matrix =
                npy::load(&data).with_context(|| format!("failed to load {}", data.display()))?;
            let trajectory = Trajectory::from_matrix(matrix)?;

            let initial = masses
                .map(|path| {
                    npy::load(&path).with_context(|| format!("failed to load {}", path.display()))
                })
                .transpose()?;
            let sizes = marker_sizes(initial.as_ref(), trajectory.bodies(), same_size)?;

            let options = PlotOptions {
                max_points,
                same_size,
                solid_color,
            };
            let points = trajectory.scatter(&options, &sizes);
            if let Some((lo, hi)) = cubic_limits(&points) {
                info!("Axis limits [{lo}, {hi}] on x, y and z");
            }

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    write_scatter_csv(file, &points)?;
                }
                None => write_scatter_csv(std::io::stdout().lock(), &points)?,
            }
            Ok(0)
        }
        Commands::Inspect { input } => {
            let matrix =
                npy::load(&input).with_context(|| format!("failed to load {}", input.display()))?;
            let summary = inspect::inspect(&matrix)
                .with_context(|| format!("{} is not valid simulator input", input.display()))?;
            println!("{summary}");
            Ok(0)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
