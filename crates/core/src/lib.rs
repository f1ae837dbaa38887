//! Core logic for Casal's shared couple workspaces.
//!
//! This crate contains access control, validation and sync logic with ZERO
//! transport or storage dependencies. The remote store is a trait.
//!
//! # Modules
//!
//! - `access` - Share codes, memberships and the remote call boundary
//! - `session` - Signed-in identity and workspace binding
//! - `entity` - Workspace entity types
//! - `validation` - Rules every entity passes before it is accepted
//! - `workspace` - Local state, validated mutations and remote merge
//! - `remote` - Contract required from the remote store

pub mod access;
pub mod entity;
pub mod remote;
pub mod session;
pub mod validation;
pub mod workspace;
