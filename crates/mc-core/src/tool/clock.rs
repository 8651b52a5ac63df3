//! Current time tool used by the clock profile

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value as JsonValue, json};

use crate::Result;
use crate::tool::{SchemaBuilder, Tool};

/// `get_current_time()` - UTC wall clock in RFC 3339
pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time (UTC)."
    }

    fn input_schema(&self) -> JsonValue {
        SchemaBuilder::empty()
    }

    async fn execute(&self, _input: JsonValue) -> Result<JsonValue> {
        Ok(json!({
            "current_time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        }))
    }
}
