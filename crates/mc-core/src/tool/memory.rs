//! Memory tools exposed to the model
//!
//! Each tool maps one tool_use name onto one [`MemoryStore`] operation and
//! returns the store's status-tagged result as JSON.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::memory::MemoryStore;
use crate::tool::{SchemaBuilder, Tool, ToolManager, required_str};
use crate::{Error, Result};

/// Shared, possibly absent, store handle
#[derive(Clone)]
struct Backend(Option<Arc<MemoryStore>>);

impl Backend {
    fn store(&self) -> Result<&MemoryStore> {
        self.0.as_deref().ok_or(Error::MemoryUnavailable)
    }
}

/// Register the five memory tools.
///
/// With `store == None` the tools are still advertised but every call
/// answers `{"error": "Memory service not available"}`.
pub fn register_memory_tools(manager: &mut ToolManager, store: Option<Arc<MemoryStore>>) {
    let backend = Backend(store);
    manager.register(Arc::new(AddMemoryTool(backend.clone())));
    manager.register(Arc::new(GetMemoryTool(backend.clone())));
    manager.register(Arc::new(ListMemoriesTool(backend.clone())));
    manager.register(Arc::new(SearchMemoriesTool(backend.clone())));
    manager.register(Arc::new(UpdateMemoryTool(backend)));
}

/// `add_memory(memory_type, key, content)`
pub struct AddMemoryTool(Backend);

#[async_trait]
impl Tool for AddMemoryTool {
    fn name(&self) -> &str {
        "add_memory"
    }

    fn description(&self) -> &str {
        "Store a fact about the user. If a memory with the same key exists it is overwritten."
    }

    fn input_schema(&self) -> JsonValue {
        SchemaBuilder::required_strings(&[
            ("memory_type", "Category of the memory, e.g. personal_info or preference"),
            ("key", "Short unique identifier, e.g. name, location, favorite_color"),
            ("content", "The information to remember"),
        ])
    }

    async fn execute(&self, input: JsonValue) -> Result<JsonValue> {
        let store = self.0.store()?;
        let outcome = store.add(
            required_str(&input, "memory_type")?,
            required_str(&input, "key")?,
            required_str(&input, "content")?,
        )?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// `get_memory(key)`
pub struct GetMemoryTool(Backend);

#[async_trait]
impl Tool for GetMemoryTool {
    fn name(&self) -> &str {
        "get_memory"
    }

    fn description(&self) -> &str {
        "Retrieve a stored memory by its key."
    }

    fn input_schema(&self) -> JsonValue {
        SchemaBuilder::required_strings(&[("key", "Key of the memory to retrieve")])
    }

    async fn execute(&self, input: JsonValue) -> Result<JsonValue> {
        let store = self.0.store()?;
        let outcome = store.get(required_str(&input, "key")?)?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// `list_memories()`
pub struct ListMemoriesTool(Backend);

#[async_trait]
impl Tool for ListMemoriesTool {
    fn name(&self) -> &str {
        "list_memories"
    }

    fn description(&self) -> &str {
        "List everything remembered about the user."
    }

    fn input_schema(&self) -> JsonValue {
        SchemaBuilder::empty()
    }

    async fn execute(&self, _input: JsonValue) -> Result<JsonValue> {
        let outcome = self.0.store()?.list()?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// `search_memories(query)`
pub struct SearchMemoriesTool(Backend);

#[async_trait]
impl Tool for SearchMemoriesTool {
    fn name(&self) -> &str {
        "search_memories"
    }

    fn description(&self) -> &str {
        "Find memories whose key or content contains the query text."
    }

    fn input_schema(&self) -> JsonValue {
        SchemaBuilder::required_strings(&[("query", "Text to look for in keys and contents")])
    }

    async fn execute(&self, input: JsonValue) -> Result<JsonValue> {
        let store = self.0.store()?;
        let outcome = store.search(required_str(&input, "query")?)?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// `update_memory(key, new_content)`
pub struct UpdateMemoryTool(Backend);

#[async_trait]
impl Tool for UpdateMemoryTool {
    fn name(&self) -> &str {
        "update_memory"
    }

    fn description(&self) -> &str {
        "Change the content of an existing memory. Fails if the key is unknown."
    }

    fn input_schema(&self) -> JsonValue {
        SchemaBuilder::required_strings(&[
            ("key", "Key of the memory to update"),
            ("new_content", "Replacement content"),
        ])
    }

    async fn execute(&self, input: JsonValue) -> Result<JsonValue> {
        let store = self.0.store()?;
        let outcome = store.update(
            required_str(&input, "key")?,
            required_str(&input, "new_content")?,
        )?;
        Ok(serde_json::to_value(outcome)?)
    }
}
