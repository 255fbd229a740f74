//! Topology rules evaluated over a runner's registered states.

use super::violations::TopologyError;
use crate::core::{Link, StateId, StateNode};
use crate::runner::Runner;
use crate::scheduler::Scheduler;
use slotmap::SlotMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TopologyError>>;

/// Check every state's links, accumulating ALL violations.
pub fn check_topology(nodes: &SlotMap<StateId, StateNode>) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    for (_, node) in nodes {
        let mut shadowed_by = None;
        for link in node.links() {
            if !nodes.contains_key(link.next()) {
                checks.push(Validation::fail(TopologyError::DanglingTarget {
                    from: node.name().to_string(),
                    link: link.id(),
                }));
            }

            if let Some(first) = shadowed_by {
                checks.push(Validation::fail(TopologyError::ShadowedLink {
                    from: node.name().to_string(),
                    link: link.id(),
                    shadowed_by: first,
                }));
            } else if matches!(link, Link::Always { .. }) {
                shadowed_by = Some(link.id());
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

impl<S: Scheduler> Runner<S> {
    /// Check the registered states for linking mistakes.
    pub fn check_topology(&self) -> Check {
        check_topology(self.nodes())
    }
}
