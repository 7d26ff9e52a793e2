//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use tracing::info;

use eventhub_core::config::{AdmissionConfig, DatabaseConfig};
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    EventRepository, HitRepository, ParticipationRequestRepository, UserRepository,
};
use crate::store::{EventDirectory, HitStore, ParticipationStore, UserDirectory};

/// The set of stores the services are built from.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// Participation request store.
    pub participation: Arc<dyn ParticipationStore>,
    /// Event lookup.
    pub events: Arc<dyn EventDirectory>,
    /// User lookup.
    pub users: Arc<dyn UserDirectory>,
    /// Hit storage.
    pub hits: Arc<dyn HitStore>,
    pool: Option<DatabasePool>,
}

impl StoreManager {
    /// Create the stores from configuration.
    pub async fn new(database: &DatabaseConfig, admission: &AdmissionConfig) -> AppResult<Self> {
        match database.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL stores");
                let pool = DatabasePool::connect(database).await?;
                if database.run_migrations {
                    crate::migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool, admission))
            }
            "memory" => {
                info!("Initializing in-memory stores");
                Ok(Self::memory(MemoryStore::new(admission.lock_timeout())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Build PostgreSQL stores over an existing pool.
    pub fn postgres(pool: DatabasePool, admission: &AdmissionConfig) -> Self {
        let pg = pool.pool().clone();
        Self {
            participation: Arc::new(ParticipationRequestRepository::new(
                pg.clone(),
                admission.lock_timeout(),
            )),
            events: Arc::new(EventRepository::new(pg.clone())),
            users: Arc::new(UserRepository::new(pg.clone())),
            hits: Arc::new(HitRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Build every store from one in-memory backend.
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            participation: Arc::new(store.clone()),
            events: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            hits: Arc::new(store),
            pool: None,
        }
    }

    /// Return the backend name for diagnostics.
    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check backend connectivity. The in-memory backend is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Close the connection pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider_is_healthy() {
        let database = DatabaseConfig {
            provider: "memory".to_string(),
            ..DatabaseConfig::default()
        };
        let manager = StoreManager::new(&database, &AdmissionConfig::default())
            .await
            .unwrap();
        assert_eq!(manager.backend(), "memory");
        assert!(manager.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_is_configuration_error() {
        let database = DatabaseConfig {
            provider: "sqlite".to_string(),
            ..DatabaseConfig::default()
        };
        let err = StoreManager::new(&database, &AdmissionConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
