// tests/aggregate_properties.rs

mod common;
use crate::common::ScriptedClient;
use crate::common::builders::{StatusBuilder, exec, status};

use std::collections::HashSet;

use edxrun::client::{TaskState, TaskStatus, TriggerOutcome};
use edxrun::monitor::{
    AccumulatedStatuses, PollConfig, StatusPoller, SubtaskMonitor, Summary, aggregate,
};
use proptest::prelude::*;

fn state_strategy() -> impl Strategy<Value = TaskState> {
    prop_oneof![
        Just(TaskState::Completed),
        Just(TaskState::Failed),
        Just(TaskState::Warning),
        Just(TaskState::Aborting),
        Just(TaskState::Disabled),
        Just(TaskState::Unrunnable),
        Just(TaskState::Waiting),
    ]
}

#[test]
fn summary_counts_only_the_reported_states() {
    let statuses = vec![
        status(1, TaskState::Completed),
        status(2, TaskState::Completed),
        status(3, TaskState::Failed),
        status(4, TaskState::Warning),
        status(5, TaskState::Aborting),
        status(6, TaskState::Disabled),
    ];

    let summary = Summary::from_statuses(&statuses);

    assert_eq!(
        summary,
        Summary {
            total: 6,
            completed: 2,
            failed: 1,
            warning: 1,
            aborting: 1,
        }
    );
}

#[test]
fn empty_status_list_follows_the_root() {
    let none: Vec<TaskStatus> = Vec::new();
    assert!(aggregate(true, &none).success);
    assert!(!aggregate(false, &none).success);
}

proptest! {
    #[test]
    fn verdict_is_root_success_and_no_failure(
        root_succeeded in any::<bool>(),
        states in proptest::collection::vec(state_strategy(), 0..20),
    ) {
        let statuses: Vec<_> = states
            .iter()
            .enumerate()
            .map(|(i, &state)| status(i as u128, state))
            .collect();

        let verdict = aggregate(root_succeeded, &statuses);

        let any_failed = states.contains(&TaskState::Failed);
        prop_assert_eq!(verdict.success, root_succeeded && !any_failed);
        prop_assert_eq!(verdict.summary.total, states.len());
        prop_assert_eq!(
            verdict.summary.failed,
            states.iter().filter(|&&s| s == TaskState::Failed).count()
        );
    }

    #[test]
    fn walk_terminates_and_polls_each_reachable_execution_once(
        edges in proptest::collection::vec(
            proptest::collection::vec(0..8u128, 0..4),
            8,
        ),
    ) {
        // Execution n reports edges[n] as its children; cycles are allowed.
        let mut client = ScriptedClient::new(TriggerOutcome::started(exec(0)));
        for (n, children) in edges.iter().enumerate() {
            client = client.always(StatusBuilder::new(n as u128).children(children).build());
        }

        let mut reachable = HashSet::from([0u128]);
        let mut stack = vec![0u128];
        while let Some(n) = stack.pop() {
            for &c in &edges[n as usize] {
                if reachable.insert(c) {
                    stack.push(c);
                }
            }
        }

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let statuses = rt.block_on(async {
            let poller = StatusPoller::new(&client, PollConfig::default());
            let root = StatusBuilder::new(0).children(&edges[0]).build();
            let mut statuses = AccumulatedStatuses::new();
            statuses.push(root.clone());
            SubtaskMonitor::new(&poller).monitor(&root, &mut statuses).await;
            statuses
        });

        let observed: HashSet<_> = statuses.iter().map(|s| s.exec_id).collect();
        prop_assert_eq!(observed.len(), statuses.len());
        let expected: HashSet<_> = reachable.iter().map(|&n| exec(n)).collect();
        prop_assert_eq!(observed, expected);
    }
}
