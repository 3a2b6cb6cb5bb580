use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parses raw user input. Anything outside the three valid values is
    /// rejected with `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A single to-do item. Identity (`id`, `text`, `priority`, `created_at`,
/// `date`) is fixed at creation; only the completion state mutates.
///
/// The serialized field names match the persisted snapshot layout:
/// `{id, text, priority, completed, createdAt, date, completedAt?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task};

    #[test]
    fn priority_parse_accepts_valid_values() {
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse(" Medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
    }

    #[test]
    fn priority_parse_rejects_unknown_values() {
        assert_eq!(Priority::parse(""), None);
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::parse("lowest"), None);
    }

    #[test]
    fn task_serializes_with_camel_case_keys() {
        let task = Task {
            id: 1734652800000,
            text: "Buy milk".to_string(),
            priority: Priority::Low,
            completed: false,
            created_at: "2025-12-20T00:00:00Z".to_string(),
            date: "Dec 20, 2025".to_string(),
            completed_at: None,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], "low");
        assert_eq!(json["createdAt"], "2025-12-20T00:00:00Z");
        assert_eq!(json["date"], "Dec 20, 2025");
        assert!(json.get("completedAt").is_none());
    }

    #[test]
    fn task_deserializes_optional_completed_at() {
        let json = r#"{
            "id": 1,
            "text": "demo",
            "priority": "high",
            "completed": true,
            "createdAt": "2025-12-20T00:00:00Z",
            "date": "Dec 20, 2025",
            "completedAt": "2025-12-21T00:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_at.as_deref(), Some("2025-12-21T00:00:00Z"));
    }
}
