pub mod books;

use libris_kernel::ModuleRegistry;

/// Register every application module with the registry.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(books::create_module());
}
