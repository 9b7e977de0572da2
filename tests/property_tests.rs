//! Property-based tests for the Graph Engine.
//!
//! These tests use proptest to drive random operation sequences through
//! the engine and check that graph invariants hold after every step.

use proptest::prelude::*;

use gitquest::core::graph::GraphState;
use gitquest::core::types::BranchName;
use gitquest::core::verify::verify;
use gitquest::engine::{self, Operation, SequentialStamper};

/// A small pool so generated sequences revisit the same branches.
const NAMES: [&str; 5] = ["main", "feature", "fix/parser", "dev", "release-1.0"];

/// An operation whose commit argument is picked from the live state.
#[derive(Debug, Clone)]
enum Step {
    Commit(String),
    Branch(usize),
    Merge(usize),
    CheckoutBranch(usize),
    CheckoutCommit(usize),
    Revert(usize),
    Issue(String),
}

impl Step {
    fn resolve(&self, state: &GraphState) -> Operation {
        let commit_id = |i: usize| {
            if state.commits.is_empty() {
                "missing".to_string()
            } else {
                state.commits[i % state.commits.len()].id.to_string()
            }
        };
        match self {
            Step::Commit(message) => Operation::Commit {
                message: message.clone(),
            },
            Step::Branch(i) => Operation::Branch {
                name: NAMES[i % NAMES.len()].into(),
            },
            Step::Merge(i) => Operation::Merge {
                source: NAMES[i % NAMES.len()].into(),
            },
            Step::CheckoutBranch(i) => Operation::Checkout {
                target: NAMES[i % NAMES.len()].into(),
            },
            Step::CheckoutCommit(i) => Operation::Checkout {
                target: commit_id(*i),
            },
            Step::Revert(i) => Operation::Revert {
                commit: commit_id(*i),
            },
            Step::Issue(title) => Operation::Issue {
                title: title.clone(),
                description: String::new(),
            },
        }
    }
}

/// Strategy for generating non-blank messages.
fn message() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,20}"
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => message().prop_map(Step::Commit),
        1 => any::<usize>().prop_map(Step::Branch),
        1 => any::<usize>().prop_map(Step::Merge),
        2 => any::<usize>().prop_map(Step::CheckoutBranch),
        1 => any::<usize>().prop_map(Step::CheckoutCommit),
        1 => any::<usize>().prop_map(Step::Revert),
        1 => message().prop_map(Step::Issue),
    ]
}

fn active_count(state: &GraphState) -> usize {
    state.branches.values().filter(|b| b.is_active).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_after_every_operation(steps in prop::collection::vec(step(), 0..40)) {
        let mut stamper = SequentialStamper::default();
        let mut state = GraphState::initial();

        for step in &steps {
            let op = step.resolve(&state);
            let before = state.clone();
            match engine::apply(&state, &op, &mut stamper) {
                Ok(next) => state = next,
                Err(_) => {
                    // Failed operations have no effect.
                    prop_assert_eq!(&state, &before);
                    continue;
                }
            }

            prop_assert_eq!(active_count(&state), 1);
            prop_assert!(state.active_branch().is_some());
            let result = verify(&state);
            prop_assert!(result.ok, "{}", result.summary());
            prop_assert!(state.commits.len() >= before.commits.len());
            prop_assert!(state.commits.starts_with(&before.commits));
        }
    }

    #[test]
    fn checkout_is_idempotent(
        steps in prop::collection::vec(step(), 0..20),
        target in any::<usize>(),
        by_commit in any::<bool>(),
    ) {
        let mut stamper = SequentialStamper::default();
        let mut state = GraphState::initial();
        for step in &steps {
            if let Ok(next) = engine::apply(&state, &step.resolve(&state), &mut stamper) {
                state = next;
            }
        }

        let target = if by_commit {
            Step::CheckoutCommit(target)
        } else {
            Step::CheckoutBranch(target)
        };
        let Operation::Checkout { target } = target.resolve(&state) else {
            unreachable!("checkout step resolves to a checkout");
        };

        if let Ok(once) = engine::checkout(&state, &target) {
            let twice = engine::checkout(&once, &target).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn json_round_trip_preserves_state(steps in prop::collection::vec(step(), 0..30)) {
        let mut stamper = SequentialStamper::default();
        let mut state = GraphState::initial();
        for step in &steps {
            if let Ok(next) = engine::apply(&state, &step.resolve(&state), &mut stamper) {
                state = next;
            }
        }

        let json = serde_json::to_string(&state).unwrap();
        let loaded = engine::load_json(&json).unwrap();
        prop_assert_eq!(loaded, state);
    }

    #[test]
    fn pool_names_are_valid_branch_names(i in any::<usize>()) {
        prop_assert!(BranchName::new(NAMES[i % NAMES.len()]).is_ok());
    }

    #[test]
    fn blank_commit_messages_are_rejected(spaces in "[ \t]{0,5}") {
        let mut stamper = SequentialStamper::default();
        let state = GraphState::initial();
        prop_assert!(engine::commit(&state, &spaces, &mut stamper).is_err());
    }
}
