//! CustomGPT resource models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A CustomGPT project (agent)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub project_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Source type the project was created from ("SITEMAP", "UPLOAD", ...)
    #[serde(default, rename = "type")]
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_chat_active: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_shared: Option<bool>,
    #[serde(default)]
    pub sitemap_path: Option<String>,
}

/// Secondary per-project counters served by /projects/{id}/stats.
/// Every field is optional; the API omits counters it has not computed yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default)]
    pub pages_found: Option<f64>,
    #[serde(default)]
    pub pages_crawled: Option<f64>,
    #[serde(default)]
    pub pages_indexed: Option<f64>,
    #[serde(default)]
    pub crawl_credits_used: Option<f64>,
    #[serde(default)]
    pub query_credits_used: Option<f64>,
    #[serde(default)]
    pub total_queries: Option<f64>,
    #[serde(default)]
    pub total_words_indexed: Option<f64>,
    #[serde(default)]
    pub total_storage_credits_used: Option<f64>,
}

/// Result body of delete endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deletion {
    #[serde(default)]
    pub deleted: bool,
}

/// Accepts `true`/`false`, `0`/`1` and `"0"`/`"1"`; the API is not consistent
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(Value::String(s)) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_accepts_integer_flags() {
        let project: Project = serde_json::from_value(json!({
            "id": 12,
            "project_name": "ChatBot",
            "type": "SITEMAP",
            "is_chat_active": 1,
            "is_shared": false,
            "updated_at": "2024-01-15T10:00:00.000000Z"
        }))
        .unwrap();
        assert_eq!(project.is_chat_active, Some(true));
        assert_eq!(project.is_shared, Some(false));
        assert_eq!(project.project_type.as_deref(), Some("SITEMAP"));
        assert!(project.created_at.is_none());
    }

    #[test]
    fn test_stats_missing_counters_are_none() {
        let stats: ProjectStats =
            serde_json::from_value(json!({ "pages_found": 5, "total_queries": 2 })).unwrap();
        assert_eq!(stats.pages_found, Some(5.0));
        assert_eq!(stats.pages_indexed, None);
    }
}
