//! Workspace umbrella crate.
//!
//! Host applications can depend on `ppc-workspace` with the `desktop-shims`
//! feature to pull in the `core-service` façade together with the desktop
//! bridge adapters, instead of wiring each workspace crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service;
