//! Grid Fill Solver
//!
//! Command-line front end for the tiling searches: count every way a set of
//! pieces can fill a grid, or find one filling that uses a set of required
//! pieces and completes the rest from fillers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gridfill::pieces::{builtin, BUILTIN_PIECES};
use gridfill::solver::{
    self, CountMode, CountOptions, FillerPiece, PieceStock, RequiredPiece, SelectOptions,
    SelectionPolicy, SolveOutcome,
};
use gridfill::{format_solution, GridMask, PieceShape, Solution};

/// Fills a grid with polyomino pieces.
#[derive(Parser)]
#[command(name = "gridfill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count every way the pieces can exactly fill the grid.
    Count {
        #[command(flatten)]
        grid: GridArgs,
        /// Piece and available count, e.g. `domino:8`. Repeatable.
        #[arg(short, long = "piece", value_name = "NAME:COUNT", required = true)]
        pieces: Vec<String>,
        #[arg(long, value_enum, default_value_t = ModeArg::Unique)]
        mode: ModeArg,
        /// Number of solutions to print.
        #[arg(long, default_value_t = 3)]
        max_stored: usize,
        /// Time budget in seconds.
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Find one filling that places every required piece.
    Solve {
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        pool: PoolArgs,
        /// Time budget in seconds.
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Run several randomized solves and keep one by policy.
    Select {
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        pool: PoolArgs,
        #[arg(long, default_value_t = 10)]
        iterations: usize,
        #[arg(long, value_enum, default_value_t = PolicyArg::First)]
        policy: PolicyArg,
        /// Time budget per attempt in seconds.
        #[arg(long)]
        timeout: Option<f64>,
        /// Total time budget in seconds.
        #[arg(long)]
        overall_timeout: Option<f64>,
    },
    /// List the built-in pieces.
    Pieces,
}

#[derive(Args)]
struct GridArgs {
    /// Fully free rectangular grid, e.g. `4x4`.
    #[arg(long, value_name = "WxH", conflicts_with = "map", required_unless_present = "map")]
    size: Option<String>,
    /// Text map file: `.` free, `#` blocked, one line per row.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,
}

#[derive(Args)]
struct PoolArgs {
    /// Piece that must be placed, with its exact count, e.g. `t:2`. Repeatable.
    #[arg(short, long = "required", value_name = "NAME:COUNT")]
    required: Vec<String>,
    /// Piece used to fill the rest, with its maximum count. Repeatable.
    #[arg(short, long = "filler", value_name = "NAME:COUNT")]
    fillers: Vec<String>,
    /// Seed for the filler order. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Count each distinct layout once.
    Unique,
    /// Count every completed search branch.
    Permutations,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    First,
    Fewest,
    Most,
}

impl From<ModeArg> for CountMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Unique => CountMode::UniqueLayouts,
            ModeArg::Permutations => CountMode::AllPermutations,
        }
    }
}

impl From<PolicyArg> for SelectionPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::First => SelectionPolicy::FirstFound,
            PolicyArg::Fewest => SelectionPolicy::FewestPieces,
            PolicyArg::Most => SelectionPolicy::MostPieces,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Count {
            grid,
            pieces,
            mode,
            max_stored,
            timeout,
        } => run_count(&grid, &pieces, mode.into(), max_stored, timeout),
        Command::Solve {
            grid,
            pool,
            timeout,
        } => run_solve(&grid, &pool, timeout),
        Command::Select {
            grid,
            pool,
            iterations,
            policy,
            timeout,
            overall_timeout,
        } => {
            let options = SelectOptions {
                iterations,
                per_call_timeout: timeout.and_then(solver::seconds),
                overall_timeout: overall_timeout.and_then(solver::seconds),
                policy: policy.into(),
            };
            run_select(&grid, &pool, &options)
        }
        Command::Pieces => {
            run_pieces();
            Ok(())
        }
    }
}

/// Counts tilings and prints the stored ones.
fn run_count(
    grid_args: &GridArgs,
    pieces: &[String],
    mode: CountMode,
    max_stored: usize,
    timeout: Option<f64>,
) -> Result<()> {
    let grid = load_grid(grid_args)?;
    let catalog = pieces
        .iter()
        .map(|entry| parse_piece(entry).map(|(shape, count)| PieceStock::new(shape, count)))
        .collect::<Result<Vec<_>>>()?;

    let options = CountOptions {
        mode,
        max_stored,
        timeout: timeout.and_then(solver::seconds),
        cancel: None,
    };
    let report = solver::count(&grid, &catalog, &options);

    if report.timed_out {
        println!("Timed out after {:?}; at least {} solutions", report.elapsed, report.count);
    } else {
        println!("Found {} solutions in {:?}", report.count, report.elapsed);
    }
    print!("{}", format_solutions(&grid, &report.solutions));

    Ok(())
}

/// Finds and prints a single constrained filling.
fn run_solve(grid_args: &GridArgs, pool: &PoolArgs, timeout: Option<f64>) -> Result<()> {
    let grid = load_grid(grid_args)?;
    let (required, fillers) = parse_pool(pool)?;
    let mut rng = make_rng(pool.seed);

    match solver::solve(&grid, &required, &fillers, timeout.and_then(solver::seconds), &mut rng) {
        SolveOutcome::Solved(solution) => {
            println!("Solved with {} pieces:", solution.len());
            print!("{}", format_solution(&grid, &solution));
        }
        SolveOutcome::Exhausted => println!("No solution exists for these pieces"),
        SolveOutcome::TimedOut => println!("Timed out before finding a solution"),
        SolveOutcome::EmptyCatalog => bail!("no required or filler pieces given"),
    }

    Ok(())
}

/// Runs the selector and prints the chosen filling.
fn run_select(grid_args: &GridArgs, pool: &PoolArgs, options: &SelectOptions) -> Result<()> {
    let grid = load_grid(grid_args)?;
    let (required, fillers) = parse_pool(pool)?;
    let mut rng = make_rng(pool.seed);

    match solver::select_best(&grid, &required, &fillers, options, &mut rng) {
        Some(solution) => {
            println!("Selected solution with {} pieces:", solution.len());
            print!("{}", format_solution(&grid, &solution));
        }
        None => println!("No attempt found a solution"),
    }

    Ok(())
}

/// Prints every built-in piece as a small map.
fn run_pieces() {
    for (name, cells) in BUILTIN_PIECES {
        let Some(shape) = builtin(name) else {
            continue;
        };
        println!("{name} ({} cells):", cells.len());
        let (width, height) = (shape.width(), shape.height());
        for y in 0..height {
            let row: String = (0..width)
                .map(|x| if cells.contains(&(x, y)) { '#' } else { ' ' })
                .collect();
            println!("  {row}");
        }
    }
}

/// Numbered listing of solutions, in the style of the count output.
fn format_solutions(grid: &GridMask, solutions: &[Solution]) -> String {
    let mut output = String::new();
    for (i, solution) in solutions.iter().enumerate() {
        output.push_str(&format!("\nSolution {}:\n", i + 1));
        output.push_str(&format_solution(grid, solution));
    }
    output
}

fn load_grid(args: &GridArgs) -> Result<GridMask> {
    if let Some(path) = &args.map {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read map {}", path.display()))?;
        return GridMask::parse(&text).with_context(|| format!("invalid map {}", path.display()));
    }

    let size = args.size.as_deref().ok_or_else(|| anyhow!("either --size or --map is required"))?;
    let (width, height) = parse_size(size)?;
    Ok(GridMask::full(width, height)?)
}

fn parse_size(size: &str) -> Result<(i32, i32)> {
    let (width, height) = size
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| anyhow!("expected size format '<width>x<height>', got {size}"))?;
    Ok((
        width.trim().parse().context("could not parse grid width")?,
        height.trim().parse().context("could not parse grid height")?,
    ))
}

/// Parses `NAME:COUNT` against the built-in catalog. A bare name means 1.
fn parse_piece(entry: &str) -> Result<(Arc<PieceShape>, usize)> {
    let (name, count) = match entry.split_once(':') {
        Some((name, count)) => (
            name,
            count
                .trim()
                .parse()
                .with_context(|| format!("could not parse count in '{entry}'"))?,
        ),
        None => (entry, 1),
    };
    let shape = builtin(name.trim()).ok_or_else(|| anyhow!("unknown piece '{name}'"))?;
    Ok((shape, count))
}

fn parse_pool(pool: &PoolArgs) -> Result<(Vec<RequiredPiece>, Vec<FillerPiece>)> {
    let required = pool
        .required
        .iter()
        .map(|entry| parse_piece(entry).map(|(shape, count)| RequiredPiece::new(shape, count)))
        .collect::<Result<Vec<_>>>()?;
    let fillers = pool
        .fillers
        .iter()
        .map(|entry| parse_piece(entry).map(|(shape, count)| FillerPiece::new(shape, count)))
        .collect::<Result<Vec<_>>>()?;
    Ok((required, fillers))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
