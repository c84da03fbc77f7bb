// task/mod.rs
//
// Task records and the shared task state store.

pub mod store;
pub mod types;

pub use store::TaskStore;
pub use types::{Task, TaskStatus, DIARIZATION_OPTION};
