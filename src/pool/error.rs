use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("Worker pool is closed")]
    Closed,

    #[error("Task queue is full")]
    Full,
}

pub type Result<T> = std::result::Result<T, PoolError>;
