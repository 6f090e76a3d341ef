use tracing::{debug, warn};

use crate::io::gateway::StoreError;
use crate::ops::collection::Selection;

/// Result of one target in a batch
#[derive(Debug)]
pub struct TargetOutcome {
    pub uuid: String,
    pub error: Option<StoreError>,
}

impl TargetOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Which tasks a batch action applies to: the selection if non-empty, else
/// the single bound task, else nothing.
pub fn resolve_targets(selection: &Selection, bound: Option<&str>) -> Vec<String> {
    if !selection.is_empty() {
        return selection.iter().map(String::from).collect();
    }
    bound.map(|uuid| vec![uuid.to_string()]).unwrap_or_default()
}

/// Run `op` once per target, sequentially. A failure on one target does
/// not stop the rest and nothing is rolled back.
pub fn apply_to_targets<F>(targets: &[String], mut op: F) -> Vec<TargetOutcome>
where
    F: FnMut(&str) -> Result<(), StoreError>,
{
    targets
        .iter()
        .map(|uuid| {
            let error = op(uuid).err();
            match &error {
                Some(e) => warn!(%uuid, error = %e, "batch target failed"),
                None => debug!(%uuid, "batch target applied"),
            }
            TargetOutcome {
                uuid: uuid.clone(),
                error,
            }
        })
        .collect()
}

/// One-line report for the status row. Returns the text and whether any
/// target failed.
pub fn summarize(verb: &str, outcomes: &[TargetOutcome]) -> (String, bool) {
    let failed: Vec<&TargetOutcome> = outcomes.iter().filter(|o| !o.is_ok()).collect();
    let ok = outcomes.len() - failed.len();
    let noun = |n: usize| if n == 1 { "task" } else { "tasks" };

    match failed.first() {
        None => (format!("{} {} {}", verb, ok, noun(ok)), false),
        Some(first) => {
            let detail = first
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            if ok == 0 && failed.len() == 1 {
                (detail, true)
            } else {
                (
                    format!(
                        "{} {} of {} {}; {} failed: {}",
                        verb,
                        ok,
                        outcomes.len(),
                        noun(outcomes.len()),
                        failed.len(),
                        detail
                    ),
                    true,
                )
            }
        }
    }
}
