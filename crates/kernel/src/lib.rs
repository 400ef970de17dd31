//! Core building blocks shared by the libris application: layered settings,
//! the module contract, and the registry that drives module lifecycle.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
