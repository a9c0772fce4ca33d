// Footstep planner command line
//
// usage: footstep_planner <config.toml> [--plot out.png|out.svg]

use std::env;
use std::process;
use std::time::Instant;

use log::{error, info};

use footstep_planner::footstep_planning::{AStarSolver, LoggingObserver, SearchOutcome};
use footstep_planner::utils::quick_plot_plan;
use footstep_planner::{PlannerConfig, PlannerResult};

struct Args {
    config_path: String,
    plot_path: Option<String>,
}

fn parse_args() -> Option<Args> {
    let mut args = env::args().skip(1);
    let config_path = args.next()?;
    let mut plot_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--plot" => plot_path = Some(args.next()?),
            _ => return None,
        }
    }
    Some(Args {
        config_path,
        plot_path,
    })
}

fn run(args: &Args) -> PlannerResult<bool> {
    let config = PlannerConfig::load(&args.config_path)?;
    let graph = config.build_graph()?;
    let start = config.start_state()?;
    let (goal_left, goal_right) = config.goal_states()?;

    info!(
        "Planning with {} successors, heuristic {}",
        graph.library().len(),
        config.heuristic().name()
    );

    let mut solver = AStarSolver::with_config(graph, config.heuristic(), config.solver_config()?)?;
    solver.set_progress_observer(Box::new(LoggingObserver::default()));

    let started = Instant::now();
    let outcome = solver.solve(start)?;
    let elapsed = started.elapsed();

    match &outcome {
        SearchOutcome::Found(solution) => {
            println!(
                "Plan found: {} footsteps, cost {:.3}, {} expansions, {:.1} ms",
                solution.path.len(),
                solution.cost,
                solution.expanded,
                elapsed.as_secs_f64() * 1000.0
            );
            for (i, step) in solution.path.iter().enumerate() {
                let p = step.position();
                println!(
                    "{:3} {:5} x={:7.3} y={:7.3} yaw={:6.3}",
                    i,
                    step.leg(),
                    p.x,
                    p.y,
                    step.yaw()
                );
            }

            if let Some(plot_path) = &args.plot_path {
                let vis = quick_plot_plan(
                    &solution.path,
                    Some((&goal_left, &goal_right)),
                    "Footstep plan",
                );
                if plot_path.ends_with(".svg") {
                    vis.save_svg(plot_path)?;
                } else {
                    vis.save_png(plot_path, 800, 600)?;
                }
                println!("Plot saved to: {}", plot_path);
            }
            Ok(true)
        }
        SearchOutcome::Exhausted { expanded } => {
            println!("No plan: search space exhausted after {} expansions", expanded);
            Ok(false)
        }
        SearchOutcome::Cancelled { reason, expanded } => {
            println!("No plan: search cancelled ({:?}) after {} expansions", reason, expanded);
            Ok(false)
        }
    }
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Some(args) => args,
        None => {
            eprintln!("usage: footstep_planner <config.toml> [--plot out.png|out.svg]");
            process::exit(2);
        }
    };

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Planning failed: {}", e);
            process::exit(1);
        }
    }
}
