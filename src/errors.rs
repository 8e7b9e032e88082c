use thiserror::Error;

/// Ошибки задачи, доставляемые вызывающему через [`TaskHandle`](crate::handle::TaskHandle)
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Error)]
pub enum TaskError {
    #[error("task panicked: {0}")]
    Panic(String),
    #[error("task was discarded before it ran")]
    Discarded,
    #[error("timed out waiting for the task result")]
    Timeout,
}

/// Внутренние сбои пула. Никогда не пробрасываются наружу,
/// только записываются в журнал ошибок.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum PoolError {
    #[error("cannot determine hardware thread count, defaulting to 1")]
    UnknownConcurrency,
    #[error("cannot spawn worker {index}: {reason}")]
    SpawnFailed { index: usize, reason: String },
    #[error("cannot join worker {index}: {reason}")]
    JoinFailed { index: usize, reason: String },
}

impl PoolError {
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, PoolError::UnknownConcurrency | PoolError::SpawnFailed { .. })
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, PoolError::JoinFailed { .. })
    }
}
