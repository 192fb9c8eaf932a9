use crate::error::AppError;
use crate::model::{Priority, Task, now_local};
use crate::storage::{BlobStore, STORE_KEY, decode_tasks, encode_tasks};
use time::OffsetDateTime;

/// Transient input fields. Cleared back to defaults after a successful
/// submit; left untouched on any rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub date: String,
    pub time: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(Task),
    Updated { index: usize, task: Task },
    /// A required field was blank. Callers stay silent on this.
    MissingField,
    /// The scheduled instant is not strictly in the future. Callers must
    /// surface this to the user.
    NotInFuture,
}

/// Owns the ordered task collection and the transient editing state, and
/// writes the whole collection back to the store on every mutation.
pub struct TaskListController<S: BlobStore> {
    store: S,
    tasks: Vec<Task>,
    draft: TaskDraft,
    edit_cursor: Option<usize>,
    search: String,
}

impl<S: BlobStore> TaskListController<S> {
    /// A missing key, an unreadable store or an undecodable payload all start
    /// the controller with an empty collection; none of them is surfaced.
    pub fn new(store: S) -> Self {
        let tasks = match store.get(STORE_KEY) {
            Ok(Some(raw)) => decode_tasks(&raw).unwrap_or_default(),
            _ => Vec::new(),
        };

        Self {
            store,
            tasks,
            draft: TaskDraft::default(),
            edit_cursor: None,
            search: String::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TaskDraft {
        &mut self.draft
    }

    pub fn edit_cursor(&self) -> Option<usize> {
        self.edit_cursor
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the draft and either appends a new record or, when an edit
    /// cursor is set, replaces the record under it.
    pub fn submit(&mut self) -> Result<SubmitOutcome, AppError> {
        self.submit_at(now_local())
    }

    /// Deterministic core of [`submit`](Self::submit); `now` is the instant
    /// the future check runs against.
    pub fn submit_at(&mut self, now: OffsetDateTime) -> Result<SubmitOutcome, AppError> {
        if self.draft.text.trim().is_empty() {
            return Ok(SubmitOutcome::MissingField);
        }
        if self.draft.date.trim().is_empty() {
            return Ok(SubmitOutcome::MissingField);
        }
        if self.draft.time.trim().is_empty() {
            return Ok(SubmitOutcome::MissingField);
        }

        let task = Task {
            text: self.draft.text.trim().to_string(),
            date: self.draft.date.trim().to_string(),
            time: self.draft.time.trim().to_string(),
            priority: self.draft.priority,
        };
        let scheduled = task
            .scheduled_instant()
            .map_err(|err| AppError::invalid_input(err.message()))?;
        if scheduled.assume_offset(now.offset()) <= now {
            return Ok(SubmitOutcome::NotInFuture);
        }

        // The cursor is only ever set by begin_edit and cleared whenever the
        // collection shrinks, so the index is in bounds here.
        let mut tasks = self.tasks.clone();
        let outcome = match self.edit_cursor {
            Some(index) => {
                tasks[index] = task.clone();
                SubmitOutcome::Updated { index, task }
            }
            None => {
                tasks.push(task.clone());
                SubmitOutcome::Added(task)
            }
        };

        sort_by_instant(&mut tasks);
        self.commit(tasks)?;
        self.edit_cursor = None;
        self.draft = TaskDraft::default();
        Ok(outcome)
    }

    /// Removes exactly one record. Survivors keep their relative order, so
    /// no re-sort is needed.
    pub fn delete(&mut self, index: usize) -> Result<Task, AppError> {
        if index >= self.tasks.len() {
            return Err(AppError::invalid_index(index));
        }

        let mut tasks = self.tasks.clone();
        let removed = tasks.remove(index);
        self.commit(tasks)?;
        self.edit_cursor = None;
        Ok(removed)
    }

    /// Empties the collection. `confirmed == false` is a plain no-op.
    pub fn clear_all(&mut self, confirmed: bool) -> Result<bool, AppError> {
        if !confirmed {
            return Ok(false);
        }

        self.commit(Vec::new())?;
        self.edit_cursor = None;
        Ok(true)
    }

    /// Copies the record's fields into the draft and arms the edit cursor.
    /// The collection itself is untouched until the next submit.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), AppError> {
        let task = self
            .tasks
            .get(index)
            .ok_or_else(|| AppError::invalid_index(index))?;

        self.draft = TaskDraft {
            text: task.text.clone(),
            date: task.date.clone(),
            time: task.time.clone(),
            priority: task.priority,
        };
        self.edit_cursor = Some(index);
        Ok(())
    }

    /// Drops a pending edit and the draft that came with it. The collection
    /// itself is untouched.
    pub fn cancel_edit(&mut self) {
        self.edit_cursor = None;
        self.draft = TaskDraft::default();
    }

    /// Transient only; neither the collection nor the store changes.
    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Case-insensitive substring match on `text`; an empty query matches
    /// everything. Each entry carries its index into the canonical
    /// collection so delete/edit keep targeting the right record under a
    /// filter.
    pub fn filtered_tasks(&self) -> Vec<(usize, &Task)> {
        let needle = self.search.trim().to_lowercase();
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| needle.is_empty() || task.text.to_lowercase().contains(&needle))
            .collect()
    }

    /// Writes the new collection to the store and only then swaps it in, so
    /// a failed write leaves memory matching what is actually on disk.
    fn commit(&mut self, tasks: Vec<Task>) -> Result<(), AppError> {
        let encoded = encode_tasks(&tasks)?;
        self.store.set(STORE_KEY, &encoded)?;
        self.tasks = tasks;
        Ok(())
    }
}

fn sort_by_instant(tasks: &mut [Task]) {
    // Stable sort; records with undecodable instants (possible only in a
    // hand-edited store file) group at the front instead of panicking.
    tasks.sort_by_key(|task| task.scheduled_instant().ok());
}
