//! Workspace state, local mutations and remote sync.
//!
//! # Modules
//!
//! - `mutation` - Local writes
//! - `state` - Entities keyed by kind and id, with revisions and tombstones
//! - `store` - Validated apply and last-writer-wins remote merge
//! - `sync` - Snapshot loading and outbox flushing

mod mutation;
mod state;
mod store;
mod sync;

#[cfg(test)]
mod workspace_props;

pub use mutation::{Mutation, MutationOp};
pub use state::{Record, WorkspaceState};
pub use store::{Clock, DrainSummary, LoadSummary, MergeOutcome, WorkspaceStore};
pub use sync::WorkspaceSync;
