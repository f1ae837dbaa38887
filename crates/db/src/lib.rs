//! Remote store adapters for Casal workspaces.
//!
//! This crate provides:
//! - [`MemoryStore`], an in-process implementation of
//!   [`casal_core::remote::RemoteStore`] with realtime change delivery
//! - Fault injection (failures and latency) for exercising the call boundary

pub mod memory;

pub use memory::MemoryStore;
