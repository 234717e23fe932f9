// src/list.rs

//! `edxrun list`: enumerate the EDX-enabled tasks of every distribution
//! service.

use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::debug;

use crate::client::{ServiceInfo, TaskCatalog, TaskInfo};
use crate::errors::Result;

/// Printed after a failed listing; the enumeration calls need more rights
/// than triggering does.
pub const PERMISSION_HINT: &str = "For using the list command it's necessary to be a member in the groups \"QlikView Management API\" and \"QlikView EDX\" on the management server!";

/// EDX tasks found on one distribution service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceListing {
    pub service: ServiceInfo,
    pub tasks: Vec<TaskInfo>,
}

/// Collect the EDX tasks of every distribution service.
///
/// Every task on a service is looked up by name among the EDX-enabled
/// tasks; only matches that live on the same service are kept.
pub async fn collect<C: TaskCatalog + ?Sized>(catalog: &C) -> Result<Vec<ServiceListing>> {
    let mut listings = Vec::new();

    for service in catalog.services().await? {
        debug!(service = %service.name, id = %service.id, "searching EDX tasks");
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();

        for task in catalog.tasks(service.id).await? {
            for edx in catalog.find_edx(&task.name).await? {
                if edx.service_id == service.id && seen.insert(edx.id) {
                    tasks.push(edx);
                }
            }
        }

        listings.push(ServiceListing { service, tasks });
    }

    Ok(listings)
}

/// Render listings as aligned text, one block per service.
pub fn render(listings: &[ServiceListing]) -> String {
    let mut out = String::new();

    for listing in listings {
        let _ = writeln!(
            out,
            "Service: ***** {}  ID: {} *****",
            listing.service.name, listing.service.id
        );

        let width = listing
            .tasks
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0)
            + 2;

        for task in &listing.tasks {
            let enabled = if task.enabled { "Enabled" } else { "Disabled" };
            let _ = writeln!(
                out,
                "Task: {:<width$} {:<21} {:<10} ID: {}",
                task.name, task.task_type, enabled, task.id
            );
        }
    }

    out
}

/// Print the listing to stdout. Returns `false` on any error.
pub async fn run_list<C: TaskCatalog + ?Sized>(catalog: &C) -> bool {
    match collect(catalog).await {
        Ok(listings) => {
            print!("{}", render(&listings));
            true
        }
        Err(err) => {
            println!("Error message: {err}");
            println!();
            println!("{PERMISSION_HINT}");
            false
        }
    }
}
