use super::model::{WorkerInfo, WorkerStatus};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc, RwLock,
    },
    thread::ThreadId,
};


/// Статус воркера. Пишет только воркер-владелец (и пул при остановке),
/// читают все, поэтому атомик вместо блокировки.
#[derive(Debug)]
pub struct StatusCell(AtomicU8);

impl StatusCell {
    pub fn new(status: WorkerStatus) -> Self {
        Self(AtomicU8::new(status as u8))
    }

    #[inline]
    pub fn get(&self) -> WorkerStatus {
        WorkerStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, status: WorkerStatus) {
        self.0.store(status as u8, Ordering::Release);
    }
}


#[derive(Debug, Clone)]
struct Entry {
    index: usize,
    status: Arc<StatusCell>,
}


/// Реестр воркеров: id потока -> статус
#[derive(Debug, Default)]
pub struct ThreadRegistry {
    entries: RwLock<HashMap<ThreadId, Entry>>,
}

impl ThreadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует воркер. Повторная регистрация того же id заменяет запись.
    pub fn register(&self, id: ThreadId, index: usize, status: Arc<StatusCell>) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, Entry { index, status });
    }

    pub fn set_status(&self, id: &ThreadId, status: WorkerStatus) -> bool {
        match self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
        {
            Some(entry) => {
                entry.status.set(status);
                true
            }
            None => false,
        }
    }

    pub fn status(&self, id: &ThreadId) -> Option<WorkerStatus> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .map(|entry| entry.status.get())
    }

    pub fn snapshot(&self) -> HashMap<ThreadId, WorkerInfo> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(id, entry)| {
                (
                    *id,
                    WorkerInfo {
                        id: *id,
                        index: entry.index,
                        status: entry.status.get(),
                    },
                )
            })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
