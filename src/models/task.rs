//! Research area and task models.

use serde::{Deserialize, Serialize};

use crate::models::schema::{double_option, Field, Kind, Model};

/// An area of research grouping related tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Area ID
    pub id: String,

    /// Area name
    pub name: String,
}

impl Model for Area {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("name", Kind::Str),
    ];
}

/// A machine learning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task ID
    pub id: String,

    /// Task name
    pub name: String,

    /// Task description
    pub description: String,
}

impl Model for Task {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("name", Kind::Str),
        Field::required("description", Kind::Str),
    ];
}

/// Request body for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreateRequest {
    /// Task name
    pub name: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Area ID or area name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    /// ID of the parent task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<String>,
}

impl TaskCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            area: None,
            parent_task: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn parent_task(mut self, parent_task: impl Into<String>) -> Self {
        self.parent_task = Some(parent_task.into());
        self
    }
}

impl Model for TaskCreateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("name", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::nullable("area", Kind::Str),
        Field::nullable("parent_task", Kind::Str),
    ];
}

/// Partial update of a task. Unset fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `Some(None)` detaches the task from its area
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub area: Option<Option<String>>,

    /// `Some(None)` removes the parent task
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub parent_task: Option<Option<String>>,
}

impl TaskUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(Some(area.into()));
        self
    }

    pub fn clear_area(mut self) -> Self {
        self.area = Some(None);
        self
    }

    pub fn parent_task(mut self, parent_task: impl Into<String>) -> Self {
        self.parent_task = Some(Some(parent_task.into()));
        self
    }

    pub fn clear_parent_task(mut self) -> Self {
        self.parent_task = Some(None);
        self
    }
}

impl Model for TaskUpdateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::nullable("name", Kind::Str),
        Field::nullable("description", Kind::Str),
        Field::nullable("area", Kind::Str),
        Field::nullable("parent_task", Kind::Str),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let request =
            TaskCreateRequest::from_value(json!({"name": "Image Classification"})).unwrap();
        assert_eq!(request.description, "");
        assert_eq!(
            request.to_payload().unwrap(),
            json!({"name": "Image Classification", "description": ""})
        );
    }

    #[test]
    fn test_update_request_tri_state() {
        let request = TaskUpdateRequest::new().description("Updated").clear_parent_task();
        assert_eq!(
            request.to_payload().unwrap(),
            json!({"description": "Updated", "parent_task": null})
        );

        let parsed = TaskUpdateRequest::from_value(json!({"area": null})).unwrap();
        assert_eq!(parsed.area, Some(None));
        assert_eq!(parsed.parent_task, None);
    }
}
