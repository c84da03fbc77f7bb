// task/store.rs
//
// Shard-locked registry of task records, shared by the background workers
// and the request handlers. All access goes through id lookups; the
// underlying map is never exposed for direct mutation.

use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use super::types::{Task, TaskStatus, DIARIZATION_OPTION};

/// Process-wide task registry.
///
/// Updates run a closure while holding the record's shard lock, so
/// concurrent writers to the same task cannot interleave into a torn update
/// and writers to different tasks rarely contend. The lock is never held
/// across external calls.
pub struct TaskStore {
    tasks: DashMap<Uuid, Task>,
    default_prompt: String,
}

impl TaskStore {
    pub fn new(default_prompt: impl Into<String>) -> Self {
        Self {
            tasks: DashMap::new(),
            default_prompt: default_prompt.into(),
        }
    }

    /// Register a new task in the `pending` state and return its id
    pub fn create_task(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tasks.insert(id, Task::new(id, &self.default_prompt));
        id
    }

    /// Snapshot of a task record, decoupled from the live entry
    pub fn get(&self, task_id: Uuid) -> Option<Task> {
        self.tasks.get(&task_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, task_id: Uuid) -> bool {
        self.tasks.contains_key(&task_id)
    }

    /// Apply `f` to the task record as a single atomic operation.
    /// Returns false when the task does not exist.
    pub fn update<F>(&self, task_id: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut Task),
    {
        match self.tasks.get_mut(&task_id) {
            Some(mut entry) => {
                f(&mut entry);
                true
            }
            None => false,
        }
    }

    /// Convenience for the common status transition, optionally updating
    /// the message and progress in the same atomic write
    pub fn set_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        message: Option<&str>,
        progress: Option<&str>,
    ) -> bool {
        self.update(task_id, |task| {
            task.status = status;
            if let Some(message) = message {
                task.message = message.to_string();
            }
            if let Some(progress) = progress {
                task.progress = progress.to_string();
            }
        })
    }

    pub fn set_option(&self, task_id: Uuid, key: &str, value: Value) -> bool {
        self.update(task_id, |task| {
            task.options.insert(key.to_string(), value);
        })
    }

    pub fn option(&self, task_id: Uuid, key: &str) -> Option<Value> {
        self.tasks
            .get(&task_id)
            .and_then(|entry| entry.options.get(key).cloned())
    }

    pub fn set_diarization_enabled(&self, task_id: Uuid, enabled: bool) -> bool {
        self.set_option(task_id, DIARIZATION_OPTION, Value::Bool(enabled))
    }

    pub fn diarization_enabled(&self, task_id: Uuid) -> bool {
        self.tasks
            .get(&task_id)
            .map(|entry| entry.diarization_enabled())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
