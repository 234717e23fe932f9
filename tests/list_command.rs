// tests/list_command.rs

mod common;
use crate::common::ScriptedClient;
use crate::common::builders::{exec, service, task_info};

use edxrun::client::TriggerOutcome;
use edxrun::list::{collect, render, run_list};

fn client() -> ScriptedClient {
    ScriptedClient::new(TriggerOutcome::started(exec(1)))
}

#[tokio::test]
async fn only_edx_tasks_of_the_same_service_are_listed() {
    let north = service(1, "QDS@north");
    let south = service(2, "QDS@south");

    let reload = task_info(10, "Reload sales", &north, true);
    let distribute = task_info(11, "Distribute", &north, false);
    let reload_south = task_info(20, "Reload sales", &south, true);

    let client = client()
        .with_service(north.clone(), vec![reload.clone(), distribute.clone()])
        .with_service(south.clone(), vec![reload_south.clone()])
        .with_edx(reload.clone())
        .with_edx(reload_south.clone());

    let listings = collect(&client).await.unwrap();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].service, north);
    assert_eq!(listings[0].tasks, vec![reload]);
    assert_eq!(listings[1].service, south);
    assert_eq!(listings[1].tasks, vec![reload_south]);
}

#[tokio::test]
async fn a_task_found_twice_is_listed_once() {
    let north = service(1, "QDS@north");
    let reload = task_info(10, "Reload", &north, true);

    let client = client()
        .with_service(north.clone(), vec![reload.clone(), reload.clone()])
        .with_edx(reload.clone());

    let listings = collect(&client).await.unwrap();

    assert_eq!(listings[0].tasks.len(), 1);
}

#[test]
fn rendering_pads_names_to_the_longest_plus_two() {
    let north = service(1, "QDS@north");
    let listings = vec![edxrun::list::ServiceListing {
        service: north.clone(),
        tasks: vec![
            task_info(10, "Reload", &north, true),
            task_info(11, "Distribute", &north, false),
        ],
    }];

    let text = render(&listings);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Service: ***** QDS@north  ID: "));
    assert!(lines[1].starts_with("Task: Reload       External Event        Enabled    ID: "));
    assert!(lines[2].starts_with("Task: Distribute   External Event        Disabled   ID: "));
}

#[tokio::test]
async fn catalog_errors_fail_the_listing() {
    let client = client()
        .with_service(service(1, "QDS@north"), vec![])
        .with_catalog_error("access denied");

    assert!(collect(&client).await.is_err());
    assert!(!run_list(&client).await);
}
