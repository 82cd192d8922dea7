//! Service lifecycle driven through its public API

use workpool::config::{Config, PoolConfig};
use workpool::service::{Service, ServiceError};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_processed_work_is_counted_after_stop() {
    let service = Service::new(PoolConfig {
        workers: 2,
        queue_capacity: 8,
    });
    service.start().unwrap();

    for i in 0..25 {
        service.process(&format!("job-{i}")).await.unwrap();
    }
    service.stop().await.unwrap();

    let snapshot = service.metrics().snapshot();
    assert_eq!(snapshot.tasks_submitted, 25);
    assert_eq!(snapshot.tasks_processed, 25);
    assert!(snapshot.task_p50 <= snapshot.task_p99);
}

#[tokio::test]
async fn test_service_can_restart() {
    let service = Service::new(Config::default().pool);

    service.start().unwrap();
    service.process("first").await.unwrap();
    service.stop().await.unwrap();
    assert_eq!(service.process("between").await, Err(ServiceError::Inactive));

    service.start().unwrap();
    service.process("second").await.unwrap();
    service.stop().await.unwrap();

    assert_eq!(service.metrics().snapshot().tasks_processed, 2);
    assert_eq!(service.stop().await, Err(ServiceError::NotActive));
}

#[tokio::test]
async fn test_pool_handle_outlives_stop_as_closed() {
    let service = Service::new(PoolConfig {
        workers: 1,
        queue_capacity: 4,
    });
    service.start().unwrap();
    let pool = service.pool().unwrap();

    service.stop().await.unwrap();
    assert!(pool.is_closed());
    assert!(pool.submit(|_| async {}).await.is_err());
}
