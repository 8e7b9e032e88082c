use super::{
    errors::PoolError,
    model::ErrorRecord,
};
use std::{
    panic::Location,
    sync::Mutex,
    thread,
    time::SystemTime,
};
use tracing::warn;


/// Журнал внутренних сбоев пула (только добавление).
#[derive(Debug, Default)]
pub struct ErrorLog {
    records: Mutex<Vec<ErrorRecord>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Записывает сбой вместе с местом вызова и id текущего потока
    #[track_caller]
    pub fn push(&self, error: PoolError) {
        let record = ErrorRecord {
            message: error.to_string(),
            error,
            timestamp: SystemTime::now(),
            worker_id: thread::current().id(),
            location: Location::caller(),
        };
        warn!(location = %record.location, "{}", record.message);

        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }

    pub fn snapshot(&self) -> Vec<ErrorRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
