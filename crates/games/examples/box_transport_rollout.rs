//! Box transport: transition previews, a scripted episode and random rollouts.
//!
//! Run with: cargo run -p boxpush-games --example box_transport_rollout [layout.json]
//!
//! Set `RUST_LOG=boxpush_games=trace` to see every sampled transition, or
//! `RUST_LOG=boxpush_core=trace` for the engine's regime decisions.

use std::error::Error;

use boxpush_core::{layouts, Action, BoxHoldState, Cell, JointAction, LayoutConfig, WorldState};
use boxpush_games::{evaluate, BoxPushEnv, FnPolicy, Policy, RandomJointPolicy, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let layout = match std::env::args().nth(1) {
        Some(path) => LayoutConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => layouts::two_box_room(),
    };

    println!("=== Box Transport ===\n");
    println!(
        "Board {}x{}, {} boxes, {} goals, {} drop spots, p_move = {}\n",
        layout.board.width,
        layout.board.height,
        layout.board.boxes.len(),
        layout.board.goals.len(),
        layout.board.drops.len(),
        layout.board.p_move
    );

    // -------------------------------------------------------------------------
    // 1. One transition, all outcomes
    // -------------------------------------------------------------------------
    println!("1. Outcome preview");
    println!("------------------\n");

    let env = BoxPushEnv::from_layout(&layout, 17)?;
    let sim = Simulator::new(BoxPushEnv::from_layout(&layout, 17)?);
    let preview = sim.preview(Action::Right, Action::Down);
    println!("From {} with (right, down):", sim.state());
    for outcome in &preview {
        println!("  {:.3}  {}", outcome.prob, outcome.state);
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Greedy walk to the first box, then random play
    // -------------------------------------------------------------------------
    println!("2. Heading for box 0");
    println!("--------------------\n");

    let target = layout.board.boxes[0];
    let toward = move |from: Cell| {
        if from.x < target.x {
            Action::Right
        } else if from.x > target.x {
            Action::Left
        } else if from.y < target.y {
            Action::Down
        } else if from.y > target.y {
            Action::Up
        } else {
            Action::Hold
        }
    };
    let seeker: FnPolicy<_, WorldState, JointAction> = FnPolicy::new(move |s: &WorldState| {
        if s.boxes[0] == BoxHoldState::WithBoth {
            JointAction::new(Action::Stay, Action::Stay)
        } else {
            JointAction::new(toward(s.a1), toward(s.a2))
        }
    });

    let mut sim = Simulator::new(BoxPushEnv::from_layout(&layout, 23)?);
    for _ in 0..30 {
        let joint = seeker.act(sim.state());
        let report = sim.step(joint.a1, joint.a2)?;
        if report.next_state.boxes[0] == BoxHoldState::WithBoth {
            break;
        }
    }
    println!(
        "After {} steps: {} (reward so far {:.1})\n",
        sim.history().len(),
        sim.state(),
        sim.total_reward()
    );

    // -------------------------------------------------------------------------
    // 3. Random joint policy
    // -------------------------------------------------------------------------
    println!("3. Random joint policy");
    println!("----------------------\n");

    let stats = evaluate(&RandomJointPolicy::new(5), &env, 50, 200);
    println!("{stats}");

    Ok(())
}
