//! Workspace access control.
//!
//! Resolves share codes to workspaces, establishes memberships and answers
//! "may this identity act on that workspace?" from already-loaded state.
//!
//! Validating a share code and being a member are distinct: a resolved code
//! alone never grants access.

pub mod boundary;

mod membership;
mod resolver;
mod share_code;

pub use boundary::CallPolicy;
pub use membership::MembershipIndex;
pub use resolver::AccessResolver;
pub use share_code::{ShareCode, ShareCodeError, ShareCodeRules};
