//! Simulator tests on the built-in layouts.
//!
//! These drive whole episodes through the public API the way an interactive
//! front end would.

use boxpush_core::{layouts, Action, BoxHoldState, Cell, JointAction, WorldState};
use boxpush_games::{
    evaluate, rollout, BoxPushEnv, Env, FnPolicy, GameError, Policy, RandomJointPolicy, Simulator,
};

#[test]
fn random_episodes_keep_states_valid() {
    let layout = layouts::two_box_room();
    let env = BoxPushEnv::from_layout(&layout, 99).unwrap();
    let board = env.board().clone();
    let policy = RandomJointPolicy::new(99);

    for _ in 0..10 {
        let trajectory = rollout(&policy, &env, 200);
        for step in &trajectory.steps {
            assert!(board.is_open(step.next_state.a1));
            assert!(board.is_open(step.next_state.a2));
            assert_eq!(step.next_state.boxes.len(), 2);
            assert!(env.outcomes(&step.state, step.action).probability_of(&step.next_state) > 0.0);
        }
    }
}

#[test]
fn same_seeds_replay_the_same_episode() {
    let layout = layouts::two_box_room();
    let run = || {
        let env = BoxPushEnv::from_layout(&layout, 5).unwrap();
        rollout(&RandomJointPolicy::new(6), &env, 100).actions()
    };
    assert_eq!(run(), run());
}

#[test]
fn interactive_single_carrier_delivery() {
    let layout = layouts::open_field();
    let mut board = layout.board().unwrap();
    board.p_move = 1.0;
    let start = WorldState::initial(&board, Cell::new(2, 2), Cell::new(0, 0));
    let mut sim = Simulator::new(BoxPushEnv::new(board, start, 0).unwrap());

    sim.step(Action::Hold, Action::Stay).unwrap();
    assert_eq!(sim.state().boxes[0], BoxHoldState::WithAgent1);
    for action in [Action::Right, Action::Right, Action::Down, Action::Down] {
        sim.step_partial(Some(action), None).unwrap();
    }
    assert_eq!(sim.state().a1, Cell::new(4, 4));

    let last = sim.step(Action::Unhold, Action::Stay).unwrap();
    assert!(last.done);
    assert_eq!(last.reward, 9.0);
    assert!(matches!(
        sim.step(Action::Stay, Action::Stay),
        Err(GameError::TerminalState)
    ));

    sim.reset();
    assert_eq!(sim.state().boxes[0], BoxHoldState::AtOriginalSpot);
    assert!(!sim.is_finished());
}

#[test]
fn hand_over_keeps_box_with_mover() {
    let layout = layouts::open_field();
    let board = layout.board().unwrap();
    let start = WorldState::new(vec![BoxHoldState::WithBoth], Cell::new(2, 2), Cell::new(2, 2));
    let env = BoxPushEnv::new(board, start.clone(), 4).unwrap();

    for _ in 0..20 {
        let step = env
            .step(&start, &JointAction::new(Action::Unhold, Action::Up))
            .unwrap();
        assert_eq!(step.next_state.boxes[0], BoxHoldState::WithAgent2);
        assert_eq!(step.next_state.a1, Cell::new(2, 2));
        assert!(step.next_state.a2 == Cell::new(2, 1) || step.next_state.a2 == Cell::new(2, 2));
    }
}

#[test]
fn goal_seeking_beats_random() {
    let layout = layouts::open_field();
    let env = BoxPushEnv::from_layout(&layout, 8).unwrap();

    // Both agents walk to the box, lift it, then carry it to the goal corner.
    let seeker = FnPolicy::new(|s: &WorldState| {
        let step_toward = |from: Cell, to: Cell| {
            if from.x < to.x {
                Action::Right
            } else if from.y < to.y {
                Action::Down
            } else if from.x > to.x {
                Action::Left
            } else if from.y > to.y {
                Action::Up
            } else {
                Action::Stay
            }
        };
        match s.boxes[0] {
            BoxHoldState::WithBoth if s.a1 == Cell::new(4, 4) => {
                JointAction::new(Action::Unhold, Action::Unhold)
            }
            BoxHoldState::WithBoth => {
                let a = step_toward(s.a1, Cell::new(4, 4));
                JointAction::new(a, a)
            }
            _ if s.a1 == Cell::new(2, 2) && s.a2 == Cell::new(2, 2) => {
                JointAction::new(Action::Hold, Action::Hold)
            }
            _ => JointAction::new(step_toward(s.a1, Cell::new(2, 2)), step_toward(s.a2, Cell::new(2, 2))),
        }
    });

    let seeker_stats = evaluate(&seeker, &env, 10, 100);
    let random_stats = evaluate(&RandomJointPolicy::new(8), &env, 10, 100);

    assert_eq!(seeker_stats.num_completed, 10);
    assert!(seeker_stats.mean_reward > random_stats.mean_reward);
    assert!(seeker.act(&env.initial_state()).a1 != Action::Stay);
}
