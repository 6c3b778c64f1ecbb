//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-service`, `core-library`, `core-metadata`).
//! Host applications can depend on `bookshelf-workspace` and enable the
//! documented features without needing to wire each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "library-only")]
pub use core_library as library;

#[cfg(feature = "lookup")]
pub use core_metadata as metadata;
