//! Footstep planning demo
//!
//! Plans a walk around a square patch of unsupported ground, streaming the
//! partial plans to a listener thread as the search expands.

use std::thread;

use crossbeam_channel::bounded;

use footstep_planner::common::{Leg, Resolution};
use footstep_planner::footstep_planning::{
    AStarSolver, ChannelProgressPublisher, FootstepGraph, FootstepHeuristic, FootstepState,
    KinematicLimits, ProgressMessage, SolverConfig, TransformLibrary,
};
use footstep_planner::utils::quick_plot_plan;
use footstep_planner::PlannerResult;

fn main() -> PlannerResult<()> {
    env_logger::init();
    println!("Footstep planning start!!");

    let resolution = Resolution::new(0.05, 0.05, 0.087)?;

    let mut graph = FootstepGraph::new(resolution);
    graph.set_basic_successors(TransformLibrary::grid(
        &[0.0, 0.1, 0.2, 0.3],
        &[-0.16, -0.2, -0.24],
        &[-0.2, 0.0, 0.2],
    ));
    graph.set_kinematic_limits(KinematicLimits {
        max_distance: Some(0.4),
        max_rotation: Some(0.3),
    })?;
    graph.set_goal_state(
        FootstepState::from_xy_yaw(Leg::Left, 2.0, 0.1, 0.0, resolution),
        FootstepState::from_xy_yaw(Leg::Right, 2.0, -0.1, 0.0, resolution),
    )?;

    // No support inside the patch [0.8, 1.2] x [-0.4, 0.4]
    graph.set_feasibility(|_stance: &FootstepState, candidate: &FootstepState| {
        let p = candidate.position();
        !((0.8..=1.2).contains(&p.x) && (-0.4..=0.4).contains(&p.y))
    });
    println!("Library holds {} transforms", graph.library().len());

    let (sender, receiver) = bounded::<ProgressMessage<FootstepState>>(64);
    let listener = thread::spawn(move || {
        let mut received = 0;
        let mut deepest = 0;
        for message in receiver.iter() {
            received += 1;
            deepest = deepest.max(message.footsteps.len());
        }
        (received, deepest)
    });

    let config = SolverConfig {
        heuristic_weight: 1.5,
        ..SolverConfig::default()
    };
    let mut solver = AStarSolver::with_config(graph, FootstepHeuristic::step_cost(), config)?;
    solver.set_progress_observer(Box::new(ChannelProgressPublisher::new(sender)));

    let start = FootstepState::from_xy_yaw(Leg::Left, 0.0, 0.1, 0.0, resolution);
    let outcome = solver.solve(start)?;
    let goals = solver
        .graph()
        .goals()
        .map(|g| (g.left.clone(), g.right.clone()));

    // Dropping the solver closes the channel and ends the listener
    drop(solver);
    let (received, deepest) = listener.join().unwrap_or((0, 0));
    println!(
        "Listener received {} progress messages, deepest partial plan {} footsteps",
        received, deepest
    );

    match outcome.solution() {
        Some(solution) => {
            println!(
                "Plan found: {} footsteps, cost {:.3}, {} expansions",
                solution.path.len(),
                solution.cost,
                solution.expanded
            );
            for step in &solution.path {
                let p = step.position();
                println!("  {:5} ({:6.2}, {:6.2}) yaw {:5.2}", step.leg(), p.x, p.y, step.yaw());
            }

            let vis = quick_plot_plan(
                &solution.path,
                goals.as_ref().map(|(l, r)| (l, r)),
                "Footstep plan around a gap",
            );
            match vis.save_png("img/footstep_walk.png", 800, 600) {
                Ok(()) => println!("Plot saved to: img/footstep_walk.png"),
                Err(e) => println!("Plot skipped: {}", e),
            }
        }
        None => println!("No plan found after {} expansions", outcome.expanded()),
    }

    println!("Footstep planning finish!!");
    Ok(())
}
