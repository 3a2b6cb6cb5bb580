use crate::clock::{Clock, rfc3339, short_date};
use crate::error::StoreError;
use crate::interact::ConfirmGate;
use crate::model::{Priority, Task};
use crate::storage::{KeyValueStore, TASKS_KEY};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
const CLEAR_PROMPT: &str = "Are you sure you want to delete all tasks?";

/// Sole authority over the task collection. Every mutating call persists the
/// full in-memory list before returning, so the snapshot always reflects the
/// latest state.
pub struct TaskStore<K: KeyValueStore, C: Clock> {
    tasks: Vec<Task>,
    kv: K,
    clock: C,
}

impl<K: KeyValueStore, C: Clock> TaskStore<K, C> {
    /// Loads the persisted snapshot. An absent or unreadable snapshot
    /// initializes the list empty; a snapshot that parses as a JSON array
    /// has records that no longer deserialize dropped individually.
    pub fn open(kv: K, clock: C) -> Self {
        let tasks = match kv.get(TASKS_KEY) {
            Ok(Some(raw)) => decode_tasks(&raw),
            _ => Vec::new(),
        };
        Self { tasks, kv, clock }
    }

    /// Creates a task at the head of the list (most recent first).
    ///
    /// Empty text and unknown priorities are rejected silently: the list is
    /// left untouched and `Ok(None)` is returned.
    pub fn create(&mut self, text: &str, priority: &str) -> Result<Option<Task>, StoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let Some(priority) = Priority::parse(priority) else {
            return Ok(None);
        };

        let now = self.clock.now();
        let task = Task {
            id: self.next_id(now),
            text: trimmed.to_string(),
            priority,
            completed: false,
            created_at: rfc3339(now)?,
            date: short_date(now)?,
            completed_at: None,
        };

        self.tasks.insert(0, task.clone());
        self.persist()?;

        Ok(Some(task))
    }

    /// Flips the completion state of the task with the given id. Sets
    /// `completedAt` on the pending -> completed transition and clears it on
    /// the way back. An unknown id is a silent no-op.
    pub fn toggle_completion(&mut self, id: i64) -> Result<Option<Task>, StoreError> {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.completed = !task.completed;
        task.completed_at = if task.completed {
            Some(rfc3339(now)?)
        } else {
            None
        };
        let updated = task.clone();

        self.persist()?;
        Ok(Some(updated))
    }

    /// Removes the task with the given id once the gate confirms. Returns
    /// whether a task was actually removed; a declined gate leaves the list
    /// and the snapshot untouched.
    pub fn delete(&mut self, id: i64, gate: &dyn ConfirmGate) -> Result<bool, StoreError> {
        if !gate.ask(DELETE_PROMPT) {
            return Ok(false);
        }

        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() < before;

        self.persist()?;
        Ok(removed)
    }

    /// Empties the entire list once the gate confirms, persisting the empty
    /// snapshot.
    pub fn clear_all(&mut self, gate: &dyn ConfirmGate) -> Result<bool, StoreError> {
        if !gate.ask(CLEAR_PROMPT) {
            return Ok(false);
        }

        self.tasks.clear();
        self.persist()?;
        Ok(true)
    }

    pub fn list_pending(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| !task.completed)
            .cloned()
            .collect()
    }

    pub fn list_completed(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.completed)
            .cloned()
            .collect()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_overdue(&self, task: &Task) -> bool {
        task_overdue(task, self.clock.now())
    }

    /// Ids are the creation instant in unix milliseconds, bumped past any
    /// collision so they stay unique within the store.
    fn next_id(&self, now: OffsetDateTime) -> i64 {
        let mut id = (now.unix_timestamp_nanos() / 1_000_000) as i64;
        while self.tasks.iter().any(|task| task.id == id) {
            id += 1;
        }
        id
    }

    fn persist(&self) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(&self.tasks)
            .map_err(|err| StoreError::corrupt_data(err.to_string()))?;
        self.kv.set(TASKS_KEY, &snapshot)
    }
}

/// A pending task is overdue once more than 24 hours have elapsed since its
/// creation. Completed tasks are never overdue, and neither is a task whose
/// `createdAt` no longer parses.
pub fn task_overdue(task: &Task, now: OffsetDateTime) -> bool {
    if task.completed {
        return false;
    }
    match OffsetDateTime::parse(&task.created_at, &Rfc3339) {
        Ok(created) => now - created > Duration::hours(24),
        Err(_) => false,
    }
}

fn decode_tasks(raw: &str) -> Vec<Task> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(_) => return Vec::new(),
    };

    values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect()
}
