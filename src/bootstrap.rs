//! Application assembly: wires settings, database, modules, and the HTTP
//! server together, and tears them down in reverse on shutdown.

use anyhow::Context;

use libris_db::{Db, MigrationScript};
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};

use crate::modules;

/// Build the registry with every application module registered.
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Apply every migration contributed by the registered modules.
pub async fn prepare_database(db: &Db, registry: &ModuleRegistry) -> anyhow::Result<()> {
    let collected = registry.collect_migrations();
    let scripts: Vec<MigrationScript<'_>> = collected
        .iter()
        .map(|(module, migration)| MigrationScript {
            module: module.as_str(),
            id: migration.id,
            sql: migration.up,
        })
        .collect();

    db.apply_migrations(&scripts)
        .await
        .context("failed to apply migrations")
}

/// Run the application: connect, migrate, init and start modules, serve until
/// shutdown, then stop modules and close the database.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry();

    let db = Db::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("failed to connect to database")?;

    prepare_database(&db, &registry).await?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    libris_http::start_server(&registry, &ctx).await?;

    registry.stop_all().await?;
    db.close().await;

    tracing::info!("shutdown complete");
    Ok(())
}
