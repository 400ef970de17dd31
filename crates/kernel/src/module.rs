use async_trait::async_trait;
use axum::Router;

/// Context handed to modules during initialization. Dependencies arrive here
/// explicitly; modules must not reach for globals.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a libris_db::Db,
}

/// Migration definition contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Contract every libris module implements.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module. Routes are mounted under `/{name}`.
    fn name(&self) -> &'static str;

    /// Called during application startup, after migrations.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// The Axum router for this module's routes. Modules build their request
    /// state (repositories etc.) from the context.
    fn routes(&self, _ctx: &InitCtx<'_>) -> Router {
        Router::new()
    }

    /// OpenAPI fragment for this module, merged into the application
    /// document with paths prefixed by the mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations contributed by this module, executed in the order returned.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background work. Called after all modules are initialized.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release resources. Called during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
