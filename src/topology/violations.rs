//! Topology problems.

use crate::core::LinkId;
use thiserror::Error;

/// A problem with how states are linked together.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Link {link} on state '{from}' points at a state that is no longer registered")]
    DanglingTarget { from: String, link: LinkId },

    #[error("Link {link} on state '{from}' can never fire: unconditional link {shadowed_by} comes first")]
    ShadowedLink {
        from: String,
        link: LinkId,
        shadowed_by: LinkId,
    },
}
