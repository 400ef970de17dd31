//! libris — a book catalog REST service.
//!
//! The application package owns module registration and assembly; the crates
//! under `crates/` provide the kernel (settings, module contract, registry),
//! database access, the HTTP facade, and telemetry bootstrap.

pub mod bootstrap;
pub mod modules;
