//! Todo list persistence.

use crate::model::todo::Todo;
use crate::store::{
    read_json, write_json, KeyValueStore, PersistedState, StoreResult, TODO_STORAGE_KEY,
};
use serde::{Deserialize, Serialize};

/// Repository interface for the ordered todo collection.
pub trait TodoRepository {
    /// Loads todos in stored order (most recently added first).
    fn load_todos(&self) -> StoreResult<Vec<Todo>>;
    fn save_todos(&self, todos: &[Todo]) -> StoreResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TodoState {
    #[serde(default)]
    todos: Vec<Todo>,
}

/// Key-value backed todo repository storing `{"state":{"todos":[...]}}`.
pub struct KvTodoRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTodoRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> TodoRepository for KvTodoRepository<S> {
    fn load_todos(&self) -> StoreResult<Vec<Todo>> {
        let persisted: Option<PersistedState<TodoState>> =
            read_json(&self.store, TODO_STORAGE_KEY)?;
        Ok(persisted
            .map(|envelope| envelope.state.todos)
            .unwrap_or_default())
    }

    fn save_todos(&self, todos: &[Todo]) -> StoreResult<()> {
        write_json(
            &self.store,
            TODO_STORAGE_KEY,
            &PersistedState::new(TodoState {
                todos: todos.to_vec(),
            }),
        )
    }
}
