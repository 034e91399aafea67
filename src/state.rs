//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, y el registro de locks por rental que
//! serializa las reservas concurrentes.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;

/// Registro de locks exclusivos por rental.
///
/// Dos solicitudes concurrentes sobre el mismo rental deben observar la
/// secuencia disponibilidad-then-insert de forma serializada; de lo
/// contrario ambas verían "disponible" antes de que alguna confirme.
/// Rentals distintos no comparten lock y se reservan en paralelo.
#[derive(Clone, Default)]
pub struct RentalLockRegistry {
    locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl RentalLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtener (o crear) el lock del rental indicado
    pub async fn acquire(&self, rental_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&rental_id) {
                return lock.clone();
            }
        }

        let mut locks = self.locks.write().await;
        if let Some(lock) = locks.get(&rental_id) {
            return lock.clone();
        }

        let lock = Arc::new(Mutex::new(()));
        locks.insert(rental_id, lock.clone());
        log::info!(
            "🔒 Lock registrado para rental '{}'. Total de locks: {}",
            rental_id,
            locks.len()
        );
        lock
    }

    /// Eliminar locks que ningún booking en curso retiene
    pub async fn cleanup_unused(&self) {
        let mut locks = self.locks.write().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        if locks.len() < before {
            log::info!(
                "🧹 Locks de rental liberados. Antes: {}, después: {}",
                before,
                locks.len()
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub rental_locks: RentalLockRegistry,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            rental_locks: RentalLockRegistry::new(),
        }
    }
}
