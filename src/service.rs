//! Lifecycle-managed service backed by a worker pool

use crate::config::PoolConfig;
use crate::observability::ServiceMetrics;
use crate::pool::{PoolError, WorkerPool};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("service not active")]
    NotActive,

    #[error("service inactive")]
    Inactive,

    #[error("Failed to submit work: {0}")]
    Submit(#[from] PoolError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Start/stop wrapper around a [`WorkerPool`].
///
/// The pool only exists while the service is active. Work handed to
/// [`Service::process`] runs on the pool and is reflected in
/// [`Service::metrics`].
#[derive(Debug)]
pub struct Service {
    config: PoolConfig,
    pool: RwLock<Option<WorkerPool>>,
    metrics: Arc<ServiceMetrics>,
}

impl Service {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    /// Activate the service, spawning its worker pool.
    ///
    /// Starting an active service is a no-op. Must be called inside a tokio
    /// runtime.
    pub fn start(&self) -> Result<()> {
        let mut pool = self.write();
        if pool.is_some() {
            return Ok(());
        }

        *pool = Some(WorkerPool::with_queue_capacity(
            self.config.workers,
            self.config.queue_capacity,
        ));
        info!("service started");
        Ok(())
    }

    /// Deactivate the service, letting queued work finish first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotActive`] if the service is not running.
    pub async fn stop(&self) -> Result<()> {
        let pool = self.write().take().ok_or(ServiceError::NotActive)?;

        pool.close_graceful().await;
        info!("service stopped");
        Ok(())
    }

    /// Queue a named unit of work.
    ///
    /// Returns once the work is queued, not when it has run.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Inactive`] if the service is not running
    /// - [`ServiceError::Submit`] if the pool shut down while queueing
    pub async fn process(&self, name: &str) -> Result<()> {
        let pool = self.read().clone().ok_or(ServiceError::Inactive)?;

        let metrics = Arc::clone(&self.metrics);
        let name = name.to_owned();
        pool.submit(move |_| async move {
            let started = Instant::now();
            info!(task = %name, "processing {name}");
            metrics.task_processed(started.elapsed());
        })
        .await?;

        self.metrics.task_submitted();
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.read().is_some()
    }

    /// Tasks waiting in the pool queue, 0 while inactive
    pub fn queue_depth(&self) -> usize {
        self.read().as_ref().map_or(0, WorkerPool::size)
    }

    /// Handle to the running pool, if any
    pub fn pool(&self) -> Option<WorkerPool> {
        self.read().clone()
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<WorkerPool>> {
        self.pool.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<WorkerPool>> {
        self.pool.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(workers: i64) -> PoolConfig {
        PoolConfig {
            workers,
            queue_capacity: 16,
        }
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let service = Service::new(config(2));
        assert!(!service.is_active());

        service.start().unwrap();
        let first = service.pool().unwrap();
        service.start().unwrap();
        let second = service.pool().unwrap();

        assert!(service.is_active());
        assert_eq!(first.workers(), second.workers());
        service.stop().await.unwrap();
        assert!(!service.is_active());
    }

    #[tokio::test]
    async fn test_stop_when_inactive() {
        let service = Service::new(config(1));
        assert_eq!(service.stop().await, Err(ServiceError::NotActive));
    }

    #[tokio::test]
    async fn test_process_when_inactive() {
        let service = Service::new(config(1));
        assert_eq!(service.process("job").await, Err(ServiceError::Inactive));
        assert_eq!(service.queue_depth(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_workers_still_run() {
        let service = Service::new(config(0));
        service.start().unwrap();
        assert_eq!(service.pool().unwrap().workers(), 1);
        service.stop().await.unwrap();
    }
}
