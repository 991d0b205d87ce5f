// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use velres_grid::combine;
use velres_grid::core::ResidualGrid;
use velres_grid::interp::{Interpolator, Mode};
use velres_grid::io;

#[derive(Parser)]
#[command(
    name = "velres-grid",
    about = "Residual-velocity grid interpolation and model updating"
)]
struct Cli {
    /// Print processing summaries to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interpolate scattered residual picks onto the model sampling
    Interp(InterpArgs),
    /// Add a dense residual grid into a velocity model
    Combine(CombineArgs),
    /// Report the element-wise difference between two velocity models
    Compare(CompareArgs),
}

#[derive(Args)]
struct InterpArgs {
    /// Grid parameter file: nz, dz, fz, nx, dx, fx, cdp_min, cdp_max,
    /// cdp_step, one value per line
    #[arg(short = 'p', long)]
    params: PathBuf,

    /// Pick stream file (count line, then `cdp depth value lambda` rows)
    #[arg(long)]
    picks: PathBuf,

    /// Marine mode: edge-hold fill outside the analyzed range plus
    /// water-bottom blanking
    #[arg(long, requires = "water_bottom")]
    marine: bool,

    /// Water-bottom file (`x depth` per model column), marine mode only
    #[arg(long, requires = "marine")]
    water_bottom: Option<PathBuf>,

    /// Write the grid as a float32 vfile instead of ASCII
    #[arg(long)]
    binary: bool,

    /// Output grid file
    #[arg(short = 'o', long, default_value = "velres.dat")]
    output: PathBuf,
}

#[derive(Args)]
struct CombineArgs {
    /// Velocity model vfile (float32, depth fastest)
    #[arg(long)]
    velocity: PathBuf,

    /// Residual grid file (ASCII unless --residual-binary)
    #[arg(long)]
    residual: PathBuf,

    /// Residual grid is a float32 vfile
    #[arg(long)]
    residual_binary: bool,

    /// Number of horizontal samples
    #[arg(long)]
    nx: usize,

    /// Number of vertical samples
    #[arg(long)]
    nz: usize,

    /// Number of worker threads for the addition
    #[arg(long)]
    threads: Option<usize>,

    /// Output vfile
    #[arg(short = 'o', long)]
    output: PathBuf,
}

#[derive(Args)]
struct CompareArgs {
    /// First model vfile
    #[arg(long)]
    original: PathBuf,

    /// Second model vfile
    #[arg(long)]
    modified: PathBuf,

    /// Number of horizontal samples
    #[arg(long)]
    nx: usize,

    /// Number of vertical samples
    #[arg(long)]
    nz: usize,
}

fn run_interp(args: &InterpArgs, verbose: bool) -> Result<()> {
    let geometry = io::read_grid_params(&args.params)
        .with_context(|| format!("bad grid parameter file {}", args.params.display()))?;
    let picks = io::read_picks_file(&args.picks, &geometry)
        .with_context(|| format!("bad pick file {}", args.picks.display()))?;

    if verbose {
        eprintln!(
            "read {} pick groups for {} analyzed columns",
            picks.len(),
            geometry.analyzed_columns().count()
        );
    }

    let interpolator = if args.marine {
        let Some(wb_path) = args.water_bottom.as_ref() else {
            bail!("--marine requires --water-bottom");
        };
        let wb = io::read_water_bottom(wb_path)
            .with_context(|| format!("bad water-bottom file {}", wb_path.display()))?;
        Interpolator::new(geometry)
            .with_mode(Mode::Marine(wb))
            .map_err(|e| anyhow!("{}", e))?
    } else {
        Interpolator::new(geometry)
    };

    let grid = interpolator
        .interpolate(&picks)
        .map_err(|e| anyhow!("{}", e))?;

    if args.binary {
        io::write_grid_vfile(&grid, &args.output)
    } else {
        io::write_grid_ascii(&grid, &args.output)
    }
    .with_context(|| format!("writing {}", args.output.display()))?;

    if verbose {
        eprintln!(
            "wrote {} values ({} columns x {} samples) to {}",
            grid.len(),
            grid.nx(),
            grid.nz(),
            args.output.display()
        );
    }
    Ok(())
}

fn run_combine(args: &CombineArgs, verbose: bool) -> Result<()> {
    let mut model = io::read_vfile(&args.velocity, args.nx, args.nz)
        .with_context(|| format!("bad velocity model {}", args.velocity.display()))?;

    let residual = if args.residual_binary {
        let raw = io::read_vfile(&args.residual, args.nx, args.nz)
            .with_context(|| format!("bad residual grid {}", args.residual.display()))?;
        ResidualGrid::from_values(args.nx, args.nz, raw.iter().map(|&v| v as f64).collect())
            .map_err(|e| anyhow!("{}", e))?
    } else {
        io::read_grid_ascii(&args.residual, args.nx, args.nz)
            .with_context(|| format!("bad residual grid {}", args.residual.display()))?
    };

    combine::add_residual_with_threads(&mut model, &residual, args.threads)
        .map_err(|e| anyhow!("{}", e))?;

    io::write_vfile(&model, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if verbose {
        eprintln!(
            "updated {} x {} model written to {}",
            args.nx,
            args.nz,
            args.output.display()
        );
    }
    Ok(())
}

fn run_compare(args: &CompareArgs) -> Result<()> {
    let original = io::read_vfile(&args.original, args.nx, args.nz)
        .with_context(|| format!("bad model {}", args.original.display()))?;
    let modified = io::read_vfile(&args.modified, args.nx, args.nz)
        .with_context(|| format!("bad model {}", args.modified.display()))?;

    let delta = combine::compare_models(&original, &modified).map_err(|e| anyhow!("{}", e))?;
    let column = delta.max_index / args.nz + 1;
    let sample = delta.max_index % args.nz + 1;

    println!("mean abs difference: {:.6}", delta.mean_abs);
    println!(
        "max abs difference:  {:.6} (column {}, sample {})",
        delta.max_abs, column, sample
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Interp(args) => run_interp(args, cli.verbose),
        Command::Combine(args) => run_combine(args, cli.verbose),
        Command::Compare(args) => run_compare(args),
    }
}
