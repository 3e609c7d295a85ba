//! Dependency injection module using Shaku.
//!
//! Wires the SQLite pool, contact directory and capability store, then
//! builds a controller over them.

use crate::EabControllerImpl;
use eab_config::{AppConfig, DatabaseConfig};
use eab_core::{EabResult, SubscriptionId, SystemClock};
use eab_repository::{
    CapabilityStore, ContactDirectory, DatabasePool, DatabasePoolParameters,
    SqliteCapabilityStore, SqliteContactDirectory,
};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;

// Storage module backed by a single SQLite database.
module! {
    pub SqliteStorageModule {
        components = [
            DatabasePool,
            SqliteContactDirectory,
            SqliteCapabilityStore,
        ],
        providers = [],
    }
}

/// Connects to the database and builds the storage module.
pub async fn build_storage_module(config: &DatabaseConfig) -> EabResult<Arc<SqliteStorageModule>> {
    let db_pool = DatabasePool::new(config).await?;

    let module = SqliteStorageModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .build();

    Ok(Arc::new(module))
}

/// Builds a controller for the configured subscription over `module`.
pub fn controller_from_module(
    module: &SqliteStorageModule,
    config: &AppConfig,
) -> EabResult<EabControllerImpl> {
    let sub_id = SubscriptionId::new(config.app.sub_id);
    let directory: Arc<dyn ContactDirectory> = module.resolve();
    let store: Arc<dyn CapabilityStore> = module.resolve();

    info!(sub_id = %sub_id, "Building capability controller");
    EabControllerImpl::new(
        directory,
        store,
        Arc::new(SystemClock),
        &config.cache.expiration_for(sub_id),
        sub_id,
    )
}

/// Connects to the database and builds a controller in one step.
pub async fn build_controller(config: &AppConfig) -> EabResult<EabControllerImpl> {
    let module = build_storage_module(&config.database).await?;
    controller_from_module(&module, config)
}
