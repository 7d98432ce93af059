use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use structopt::clap::AppSettings;
use structopt::StructOpt;

use labyrinth_solver::{loader, render, solver::assert_no_dead_cell_on_path, BidirectionalDfs, PrunerWalker, Solver};

#[derive(Debug, StructOpt)]
#[structopt(
    rename_all = "kebab-case",
    raw(global_settings = "&[AppSettings::ColoredHelp]")
)]
struct Opt {
    /// Maze file to load and solve (the packed little-endian format, §6)
    input: PathBuf,
    /// Number of row-band pruner threads for M1
    #[structopt(long = "bands", default_value = "0")]
    bands: usize,
    /// Number of forward DFS workers for M2
    #[structopt(long = "forward-workers", default_value = "0")]
    forward_workers: usize,
    /// Number of reverse DFS workers for M2
    #[structopt(long = "reverse-workers", default_value = "0")]
    reverse_workers: usize,
    /// Skip M1 (row-band pruning + painter/walker) and only run M2
    #[structopt(long = "skip-m1")]
    skip_m1: bool,
    /// Skip M2 (bidirectional DFS) and only run M1
    #[structopt(long = "skip-m2")]
    skip_m2: bool,
    /// Render the loaded maze (and the last solver's path) to this PNG,
    /// for debugging by eye. Not part of the solve/verify contract.
    #[structopt(long = "render-png")]
    render_png: Option<PathBuf>,
}

/// Picks a worker-count default proportional to the machine's logical
/// core count, per §4.8's "K typically equals logical-CPU count minus
/// two", leaving room for the thread running this driver plus the main
/// OS scheduler noise. Never drops below 1.
fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}

fn run_one(
    name: &str,
    maze: &labyrinth_solver::Maze,
    solver: &dyn Solver,
) -> (bool, Vec<labyrinth_solver::position::Direction>) {
    let start = Instant::now();
    let path = solver.solve(maze);
    let elapsed = start.elapsed();

    let ok = maze.check_solution(&path);
    if ok {
        assert_no_dead_cell_on_path(maze.grid(), maze.start(), &path);
    }

    println!(
        "{name}: {status} ({moves} moves, {elapsed:?})",
        name = name,
        status = if ok { "passed" } else { "FAILED" },
        moves = path.len(),
        elapsed = elapsed,
    );
    (ok, path)
}

fn main() -> ExitCode {
    env_logger::init();
    let opt = Opt::from_args();

    let maze = match loader::load_maze(&opt.input) {
        Ok(maze) => maze,
        Err(err) => {
            eprintln!("failed to load {}: {}", opt.input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "loaded {}x{} maze from {}",
        maze.width(),
        maze.height(),
        opt.input.display()
    );

    let default_workers = default_worker_count();
    let bands = if opt.bands > 0 { opt.bands } else { default_workers };
    let forward_workers = if opt.forward_workers > 0 {
        opt.forward_workers
    } else {
        default_workers
    };
    let reverse_workers = if opt.reverse_workers > 0 {
        opt.reverse_workers
    } else {
        default_workers
    };

    let mut all_passed = true;
    let mut last_path = None;

    if !opt.skip_m1 {
        let solver = PrunerWalker::new(bands.min(maze.height()));
        let (ok, path) = run_one("M1 (pruner + walker)", &maze, &solver);
        all_passed &= ok;
        last_path = Some(path);
    }

    if !opt.skip_m2 {
        let solver = BidirectionalDfs::new(forward_workers, reverse_workers);
        let (ok, path) = run_one("M2 (bidirectional DFS)", &maze, &solver);
        all_passed &= ok;
        last_path = Some(path);
    }

    if let Some(out_path) = &opt.render_png {
        let img = render::render(maze.grid(), last_path.as_deref());
        if let Err(err) = img.save(out_path) {
            eprintln!("failed to write {}: {}", out_path.display(), err);
        }
    }

    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
