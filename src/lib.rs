//! Bookshelf Application Library
//!
//! Read-only GraphQL catalogue of books, served through the bookshelf kernel
//! and HTTP facade.

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;

/// Re-export commonly used types
pub use modules::*;

/// Build a registry holding every application module
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings).context("failed to register modules")?;
    Ok(registry)
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let registry = build_registry(settings)?;
    tracing::info!(modules = registry.module_count(), "module registry built");
    let ctx = InitCtx { settings };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, settings).await;
    registry.stop_modules().await?;
    served
}
