//! One-hop rescheduling of dependent milestones.
//!
//! After a milestone's dates change, every milestone that depends on it is
//! shifted according to the dependency type. Only direct dependents move;
//! their own dependents are left alone. Failures on individual edges are
//! logged and skipped, never propagated to the caller.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{DependencyType, Milestone};
use crate::store::{DependencyStore, MilestoneStore};

pub struct Rescheduler {
    milestones: Arc<dyn MilestoneStore>,
    dependencies: Arc<dyn DependencyStore>,
}

impl Rescheduler {
    pub fn new(milestones: Arc<dyn MilestoneStore>, dependencies: Arc<dyn DependencyStore>) -> Self {
        Self {
            milestones,
            dependencies,
        }
    }

    /// Shift every direct dependent of `source`, returning how many were
    /// actually moved. A source without an end date anchors nothing and is a
    /// no-op.
    pub fn reschedule_dependents(&self, source: &Milestone) -> usize {
        let Some(source_end) = source.end_date else {
            return 0;
        };

        let edges = match self.dependencies.list_by_source(&source.id) {
            Ok(edges) => edges,
            Err(err) => {
                warn!(source = %source.id, error = %err, "listing dependents failed");
                return 0;
            }
        };

        let mut shifted = 0;
        for edge in edges {
            let mut target = match self.milestones.get(&edge.target_milestone_id) {
                Ok(target) => target,
                Err(err) => {
                    warn!(
                        dependency = %edge.id,
                        target = %edge.target_milestone_id,
                        error = %err,
                        "loading dependent milestone failed"
                    );
                    continue;
                }
            };

            let (new_start, new_end) = shifted_dates(edge.dep_type, source, source_end, &target);
            if target.start_date == new_start && target.end_date == Some(new_end) {
                continue;
            }

            target.start_date = new_start;
            target.end_date = Some(new_end);
            target.touch();

            if let Err(err) = self.milestones.update(&target) {
                warn!(
                    dependency = %edge.id,
                    target = %target.id,
                    error = %err,
                    "persisting rescheduled milestone failed"
                );
                continue;
            }
            shifted += 1;
        }
        shifted
    }
}

/// New dates for `target` given the dependency type and the source anchor.
///
/// The shift is expressed relative to the current gap between the anchor and
/// the constrained date, so a second application with unchanged inputs
/// produces the same dates again.
fn shifted_dates(
    dep_type: DependencyType,
    source: &Milestone,
    source_end: NaiveDate,
    target: &Milestone,
) -> (NaiveDate, NaiveDate) {
    match dep_type {
        DependencyType::FinishToStart => {
            let gap = target.start_date - source_end;
            let new_start = source_end + gap;
            let new_end = match target.end_date {
                Some(end) => end + (new_start - target.start_date),
                None => new_start,
            };
            (new_start, new_end)
        }
        DependencyType::StartToStart => {
            let gap = target.start_date - source.start_date;
            let new_start = source.start_date + gap;
            let new_end = match target.end_date {
                Some(end) => end + (new_start - target.start_date),
                None => new_start,
            };
            (new_start, new_end)
        }
        DependencyType::FinishToFinish => match target.end_date {
            Some(end) => {
                let gap = end - source_end;
                let new_end = source_end + gap;
                let new_start = target.start_date + (new_end - end);
                (new_start, new_end)
            }
            None => (target.start_date, NaiveDate::default()),
        },
    }
}
