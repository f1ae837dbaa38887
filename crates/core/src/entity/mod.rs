//! Closed set of workspace entities.
//!
//! Every entity carries its own id and the id of the couple workspace it
//! belongs to. Entities travel as the tagged [`Entity`] enum so validators and
//! merges dispatch by exhaustive matching.

mod key;
mod profile;
mod types;

pub use key::{EntityKey, EntityKind};
pub use profile::{PLACEHOLDER_NAMES, ProfileStatus};
pub use types::{Agreement, AgreementShare, Card, Entity, Expense, Profile, Settlement, Tag};
