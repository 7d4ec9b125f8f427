//! Pure shaping for task forms, filters, and task display.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages keep raw input strings in signals; these helpers turn them into the
//! request payloads the backend expects so the conversion rules are testable
//! without rendering anything.

#[cfg(test)]
#[path = "task_form_test.rs"]
mod task_form_test;

use serde_json::{Map, Value};

use crate::net::types::NewTask;
use crate::util::credential::SubjectId;

/// Kinds selectable when creating a task.
pub const TASK_KINDS: [&str; 2] = ["Task", "Bug"];
/// Kinds selectable in the list filter.
pub const FILTER_KINDS: [&str; 3] = ["Task", "Bug", "Improvement"];
pub const CHANGE_TYPES: [&str; 3] = ["API", "UI", "DB"];

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill required fields: Task Name, Type and Changes Type.";

/// Split a comma-separated input into trimmed, non-empty items.
///
/// With `numeric`, items that parse as numbers become JSON numbers; anything
/// else stays a string.
pub fn parse_list(raw: &str, numeric: bool) -> Vec<Value> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| if numeric { numeric_or_text(item) } else { Value::from(item) })
        .collect()
}

fn numeric_or_text(item: &str) -> Value {
    if let Ok(int) = item.parse::<i64>() {
        return Value::from(int);
    }
    match item.parse::<f64>() {
        Ok(float) if float.is_finite() => Value::from(float),
        _ => Value::from(item),
    }
}

fn non_empty(list: Vec<Value>) -> Option<Vec<Value>> {
    (!list.is_empty()).then_some(list)
}

/// Yes/No/any select used by list filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Any,
    Yes,
    No,
}

impl TriState {
    /// Interpret a `<select>` value: `"true"`, `"false"`, or anything else.
    pub fn from_select(raw: &str) -> Self {
        match raw {
            "true" => Self::Yes,
            "false" => Self::No,
            _ => Self::Any,
        }
    }

    pub fn as_select(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Yes => "true",
            Self::No => "false",
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Any => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }
}

/// Raw task list filter inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub kind: String,
    pub bug_number: String,
    pub task_number: String,
    pub is_merged: TriState,
    pub is_completed: TriState,
    pub task_name: String,
}

/// Body for `POST /task/list`. Empty filters are omitted.
pub fn filter_payload(user_id: Option<&SubjectId>, filters: &TaskFilters) -> Value {
    let mut payload = Map::new();
    if let Some(id) = user_id {
        payload.insert("user_id".to_owned(), serde_json::to_value(id).unwrap_or(Value::Null));
    }
    let text_fields = [
        ("type", &filters.kind),
        ("bug_number", &filters.bug_number),
        ("task_number", &filters.task_number),
        ("task_name", &filters.task_name),
    ];
    for (key, value) in text_fields {
        if !value.is_empty() {
            payload.insert(key.to_owned(), Value::from(value.as_str()));
        }
    }
    if let Some(merged) = filters.is_merged.as_bool() {
        payload.insert("is_merged".to_owned(), Value::Bool(merged));
    }
    if let Some(completed) = filters.is_completed.as_bool() {
        payload.insert("is_completed".to_owned(), Value::Bool(completed));
    }
    Value::Object(payload)
}

/// Raw inputs of the create-task form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub task_name: String,
    pub task_number: String,
    pub bug_number: String,
    pub kinds: Vec<String>,
    pub branch_name: String,
    pub changes: Vec<String>,
    pub description: String,
}

impl TaskDraft {
    /// Task name, branch, at least one kind and one change type are required.
    pub fn is_valid(&self) -> bool {
        !self.task_name.trim().is_empty()
            && !self.kinds.is_empty()
            && !self.changes.is_empty()
            && !self.branch_name.trim().is_empty()
    }

    /// Build the create payload.
    ///
    /// # Errors
    ///
    /// Returns the user-facing required-fields message when the draft is invalid.
    pub fn to_new_task(&self, user_id: Option<SubjectId>) -> Result<NewTask, &'static str> {
        if !self.is_valid() {
            return Err(REQUIRED_FIELDS_MESSAGE);
        }
        Ok(NewTask {
            task_name: self.task_name.clone(),
            task_number: non_empty(parse_list(&self.task_number, true)),
            bug_number: non_empty(parse_list(&self.bug_number, true)),
            kind: self.kinds.clone(),
            branch_name: non_empty(parse_list(&self.branch_name, false)),
            changes_type: self.changes.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            user_id,
        })
    }
}

/// Toggle `item` in a multi-select list.
pub fn toggle_choice(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|v| v == item) {
        list.remove(pos);
    } else {
        list.push(item.to_owned());
    }
}

/// Render an array or scalar field as comma-separated text.
pub fn as_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(as_csv).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
