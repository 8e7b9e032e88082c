//! Пул потоков с фиксированным числом воркеров
//!
//! # Features
//! - Фиксированный набор именованных потоков (явно или по числу ядер)
//! - Общая FIFO очередь без busy-wait: воркер спит до следующего push
//! - Результат задачи через `TaskHandle` (await или блокирующий `join`)
//! - Паники задач перехватываются и возвращаются как `TaskError::Panic`
//! - Реестр воркеров со статусами и журнал внутренних ошибок
//! - Остановка через join каждого воркера, автоматически при drop

pub mod error_log;
pub mod errors;
pub mod handle;
pub mod model;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod result;
mod worker;

pub use pool::{ThreadPool, Config};
