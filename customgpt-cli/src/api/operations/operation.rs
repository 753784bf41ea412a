//! Core Operation types for CustomGPT API endpoints

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::request::{ApiRequest, FormPart};

/// Represents a single call that can be executed against the CustomGPT API.
/// Each variant carries every parameter of the call, so re-sending an
/// operation always re-sends the same request.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    // === Projects ===
    /// GET /projects?page=N
    ListProjects { page: u32 },
    /// POST /projects
    CreateProject {
        project_name: String,
        source: ProjectSource,
    },
    /// GET /projects/{id}
    GetProject { project_id: u64 },
    /// POST /projects/{id}
    UpdateProject {
        project_id: u64,
        project_name: Option<String>,
        is_shared: Option<bool>,
    },
    /// DELETE /projects/{id}
    DeleteProject { project_id: u64 },
    /// GET /projects/{id}/stats
    ProjectStats { project_id: u64 },

    // === Conversations and messages ===
    /// GET /projects/{id}/conversations?page=N
    ListConversations { project_id: u64, page: u32 },
    /// POST /projects/{id}/conversations
    CreateConversation { project_id: u64, name: String },
    /// PUT /projects/{id}/conversations/{session}
    UpdateConversation {
        project_id: u64,
        session_id: String,
        name: String,
    },
    /// DELETE /projects/{id}/conversations/{session}
    DeleteConversation { project_id: u64, session_id: String },
    /// POST /projects/{id}/conversations/{session}/messages
    SendMessage {
        project_id: u64,
        session_id: String,
        prompt: String,
        /// Ask the server for a text/event-stream body
        stream: bool,
        custom_persona: Option<String>,
    },
    /// GET /projects/{id}/conversations/{session}/messages?page=N
    ListMessages {
        project_id: u64,
        session_id: String,
        page: u32,
    },
    /// GET /projects/{id}/citations/{citation}
    GetCitation { project_id: u64, citation_id: u64 },

    // === Pages ===
    /// GET /projects/{id}/pages?page=N
    ListPages { project_id: u64, page: u32 },
    /// DELETE /projects/{id}/pages/{page}
    DeletePage { project_id: u64, page_id: u64 },
    /// POST /projects/{id}/pages/{page}/reindex
    ReindexPage { project_id: u64, page_id: u64 },
    /// GET /projects/{id}/pages/{page}/metadata
    GetPageMetadata { project_id: u64, page_id: u64 },
    /// PUT /projects/{id}/pages/{page}/metadata
    UpdatePageMetadata {
        project_id: u64,
        page_id: u64,
        metadata: PageMetadataUpdate,
    },

    // === Settings ===
    /// GET /projects/{id}/settings
    GetSettings { project_id: u64 },
    /// POST /projects/{id}/settings (multipart form)
    UpdateSettings {
        project_id: u64,
        settings: SettingsUpdate,
    },

    // === Plugins ===
    /// GET /projects/{id}/plugins
    GetPlugin { project_id: u64 },
    /// POST /projects/{id}/plugins
    CreatePlugin { project_id: u64, plugin: PluginPayload },
    /// PUT /projects/{id}/plugins
    UpdatePlugin { project_id: u64, plugin: PluginPayload },

    // === Sources ===
    /// GET /projects/{id}/sources
    ListSources { project_id: u64 },
    /// POST /projects/{id}/sources
    CreateSource {
        project_id: u64,
        source: ProjectSource,
    },
    /// DELETE /projects/{id}/sources/{source}
    DeleteSource { project_id: u64, source_id: u64 },

    // === Reports ===
    /// GET /projects/{id}/reports/{kind}
    Report {
        project_id: u64,
        kind: ReportKind,
        interval: Option<ReportInterval>,
    },

    // === Users ===
    /// GET /user
    GetUser,
    /// POST /user
    UpdateUser { name: String },
}

/// Content a project (or an added source) is built from
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectSource {
    /// Crawl the pages listed in a sitemap
    Sitemap(String),
    /// Upload a document
    File { file_name: String, bytes: Vec<u8> },
}

/// Fields accepted by the page metadata endpoint; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMetadataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Project settings update, sent as a multipart form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub default_prompt: Option<String>,
    pub example_questions: Vec<String>,
    pub response_source: Option<String>,
    pub chatbot_msg_lang: Option<String>,
    pub persona_instructions: Option<String>,
}

/// Plugin definition for a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginPayload {
    pub model_name: String,
    pub human_name: String,
    pub keywords: String,
    pub description: String,
    pub is_active: bool,
}

/// Report families exposed under /projects/{id}/reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    Traffic,
    Queries,
    Conversations,
    Analysis,
}

/// Aggregation interval for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportInterval {
    Daily,
    Weekly,
    Monthly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Queries => "queries",
            Self::Conversations => "conversations",
            Self::Analysis => "analysis",
        }
    }
}

impl ReportInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl SettingsUpdate {
    /// Check if the update would change anything
    pub fn is_empty(&self) -> bool {
        self.default_prompt.is_none()
            && self.example_questions.is_empty()
            && self.response_source.is_none()
            && self.chatbot_msg_lang.is_none()
            && self.persona_instructions.is_none()
    }

    fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = Vec::new();
        let scalars = [
            ("default_prompt", &self.default_prompt),
            ("response_source", &self.response_source),
            ("chatbot_msg_lang", &self.chatbot_msg_lang),
            ("persona_instructions", &self.persona_instructions),
        ];
        for (name, value) in scalars {
            if let Some(value) = value {
                parts.push(FormPart::text(name, value.clone()));
            }
        }
        for (i, question) in self.example_questions.iter().enumerate() {
            parts.push(FormPart::text(format!("example_questions[{}]", i), question.clone()));
        }
        parts
    }
}

impl Operation {
    /// Create a new ListProjects operation
    pub fn list_projects(page: u32) -> Self {
        Self::ListProjects { page }
    }

    /// Create a new ProjectStats operation
    pub fn project_stats(project_id: u64) -> Self {
        Self::ProjectStats { project_id }
    }

    /// Create a new DeleteProject operation
    pub fn delete_project(project_id: u64) -> Self {
        Self::DeleteProject { project_id }
    }

    /// Get the operation name as a string (used in logs)
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListProjects { .. } => "list_projects",
            Self::CreateProject { .. } => "create_project",
            Self::GetProject { .. } => "get_project",
            Self::UpdateProject { .. } => "update_project",
            Self::DeleteProject { .. } => "delete_project",
            Self::ProjectStats { .. } => "project_stats",
            Self::ListConversations { .. } => "list_conversations",
            Self::CreateConversation { .. } => "create_conversation",
            Self::UpdateConversation { .. } => "update_conversation",
            Self::DeleteConversation { .. } => "delete_conversation",
            Self::SendMessage { .. } => "send_message",
            Self::ListMessages { .. } => "list_messages",
            Self::GetCitation { .. } => "get_citation",
            Self::ListPages { .. } => "list_pages",
            Self::DeletePage { .. } => "delete_page",
            Self::ReindexPage { .. } => "reindex_page",
            Self::GetPageMetadata { .. } => "get_page_metadata",
            Self::UpdatePageMetadata { .. } => "update_page_metadata",
            Self::GetSettings { .. } => "get_settings",
            Self::UpdateSettings { .. } => "update_settings",
            Self::GetPlugin { .. } => "get_plugin",
            Self::CreatePlugin { .. } => "create_plugin",
            Self::UpdatePlugin { .. } => "update_plugin",
            Self::ListSources { .. } => "list_sources",
            Self::CreateSource { .. } => "create_source",
            Self::DeleteSource { .. } => "delete_source",
            Self::Report { .. } => "report",
            Self::GetUser => "get_user",
            Self::UpdateUser { .. } => "update_user",
        }
    }

    /// Get the project this operation targets, if any
    pub fn project_id(&self) -> Option<u64> {
        match self {
            Self::ListProjects { .. }
            | Self::CreateProject { .. }
            | Self::GetUser
            | Self::UpdateUser { .. } => None,
            Self::GetProject { project_id }
            | Self::UpdateProject { project_id, .. }
            | Self::DeleteProject { project_id }
            | Self::ProjectStats { project_id }
            | Self::ListConversations { project_id, .. }
            | Self::CreateConversation { project_id, .. }
            | Self::UpdateConversation { project_id, .. }
            | Self::DeleteConversation { project_id, .. }
            | Self::SendMessage { project_id, .. }
            | Self::ListMessages { project_id, .. }
            | Self::GetCitation { project_id, .. }
            | Self::ListPages { project_id, .. }
            | Self::DeletePage { project_id, .. }
            | Self::ReindexPage { project_id, .. }
            | Self::GetPageMetadata { project_id, .. }
            | Self::UpdatePageMetadata { project_id, .. }
            | Self::GetSettings { project_id }
            | Self::UpdateSettings { project_id, .. }
            | Self::GetPlugin { project_id }
            | Self::CreatePlugin { project_id, .. }
            | Self::UpdatePlugin { project_id, .. }
            | Self::ListSources { project_id }
            | Self::CreateSource { project_id, .. }
            | Self::DeleteSource { project_id, .. }
            | Self::Report { project_id, .. } => Some(*project_id),
        }
    }

    /// Resolve the HTTP request for this operation
    pub fn request(&self) -> ApiRequest {
        match self {
            Self::ListProjects { page } => ApiRequest::get("projects").query("page", page),
            Self::CreateProject {
                project_name,
                source,
            } => source_request(ApiRequest::post("projects"), Some(project_name), source),
            Self::GetProject { project_id } => ApiRequest::get(format!("projects/{}", project_id)),
            Self::UpdateProject {
                project_id,
                project_name,
                is_shared,
            } => {
                let mut body = Map::new();
                if let Some(name) = project_name {
                    body.insert("project_name".to_string(), json!(name));
                }
                if let Some(shared) = is_shared {
                    body.insert("is_shared".to_string(), json!(*shared));
                }
                ApiRequest::post(format!("projects/{}", project_id)).json(Value::Object(body))
            }
            Self::DeleteProject { project_id } => {
                ApiRequest::delete(format!("projects/{}", project_id))
            }
            Self::ProjectStats { project_id } => {
                ApiRequest::get(format!("projects/{}/stats", project_id))
            }
            Self::ListConversations { project_id, page } => {
                ApiRequest::get(format!("projects/{}/conversations", project_id))
                    .query("page", page)
            }
            Self::CreateConversation { project_id, name } => {
                ApiRequest::post(format!("projects/{}/conversations", project_id))
                    .json(json!({ "name": name }))
            }
            Self::UpdateConversation {
                project_id,
                session_id,
                name,
            } => ApiRequest::put(format!(
                "projects/{}/conversations/{}",
                project_id, session_id
            ))
            .json(json!({ "name": name })),
            Self::DeleteConversation {
                project_id,
                session_id,
            } => ApiRequest::delete(format!(
                "projects/{}/conversations/{}",
                project_id, session_id
            )),
            Self::SendMessage {
                project_id,
                session_id,
                prompt,
                stream,
                custom_persona,
            } => {
                let mut body = json!({
                    "prompt": prompt,
                    "stream": if *stream { 1 } else { 0 },
                });
                if let Some(persona) = custom_persona {
                    body["custom_persona"] = json!(persona);
                }
                ApiRequest::post(format!(
                    "projects/{}/conversations/{}/messages",
                    project_id, session_id
                ))
                .json(body)
            }
            Self::ListMessages {
                project_id,
                session_id,
                page,
            } => ApiRequest::get(format!(
                "projects/{}/conversations/{}/messages",
                project_id, session_id
            ))
            .query("page", page),
            Self::GetCitation {
                project_id,
                citation_id,
            } => ApiRequest::get(format!("projects/{}/citations/{}", project_id, citation_id)),
            Self::ListPages { project_id, page } => {
                ApiRequest::get(format!("projects/{}/pages", project_id)).query("page", page)
            }
            Self::DeletePage {
                project_id,
                page_id,
            } => ApiRequest::delete(format!("projects/{}/pages/{}", project_id, page_id)),
            Self::ReindexPage {
                project_id,
                page_id,
            } => ApiRequest::post(format!(
                "projects/{}/pages/{}/reindex",
                project_id, page_id
            )),
            Self::GetPageMetadata {
                project_id,
                page_id,
            } => ApiRequest::get(format!(
                "projects/{}/pages/{}/metadata",
                project_id, page_id
            )),
            Self::UpdatePageMetadata {
                project_id,
                page_id,
                metadata,
            } => ApiRequest::put(format!(
                "projects/{}/pages/{}/metadata",
                project_id, page_id
            ))
            .json(serde_json::to_value(metadata).unwrap_or(Value::Null)),
            Self::GetSettings { project_id } => {
                ApiRequest::get(format!("projects/{}/settings", project_id))
            }
            Self::UpdateSettings {
                project_id,
                settings,
            } => ApiRequest::post(format!("projects/{}/settings", project_id))
                .multipart(settings.form_parts()),
            Self::GetPlugin { project_id } => {
                ApiRequest::get(format!("projects/{}/plugins", project_id))
            }
            Self::CreatePlugin { project_id, plugin } => {
                ApiRequest::post(format!("projects/{}/plugins", project_id))
                    .json(serde_json::to_value(plugin).unwrap_or(Value::Null))
            }
            Self::UpdatePlugin { project_id, plugin } => {
                ApiRequest::put(format!("projects/{}/plugins", project_id))
                    .json(serde_json::to_value(plugin).unwrap_or(Value::Null))
            }
            Self::ListSources { project_id } => {
                ApiRequest::get(format!("projects/{}/sources", project_id))
            }
            Self::CreateSource { project_id, source } => source_request(
                ApiRequest::post(format!("projects/{}/sources", project_id)),
                None,
                source,
            ),
            Self::DeleteSource {
                project_id,
                source_id,
            } => ApiRequest::delete(format!("projects/{}/sources/{}", project_id, source_id)),
            Self::Report {
                project_id,
                kind,
                interval,
            } => ApiRequest::get(format!(
                "projects/{}/reports/{}",
                project_id,
                kind.as_str()
            ))
            .query_opt("interval", interval.map(|i| i.as_str())),
            Self::GetUser => ApiRequest::get("user"),
            Self::UpdateUser { name } => ApiRequest::post("user").json(json!({ "name": name })),
        }
    }
}

/// Sitemaps go as JSON, uploads as a multipart form
fn source_request(
    request: ApiRequest,
    project_name: Option<&String>,
    source: &ProjectSource,
) -> ApiRequest {
    match source {
        ProjectSource::Sitemap(url) => {
            let mut body = json!({ "sitemap_path": url });
            if let Some(name) = project_name {
                body["project_name"] = json!(name);
            }
            request.json(body)
        }
        ProjectSource::File { file_name, bytes } => {
            let mut parts = Vec::new();
            if let Some(name) = project_name {
                parts.push(FormPart::text("project_name", name.clone()));
            }
            parts.push(FormPart::file("file", file_name.clone(), bytes.clone()));
            request.multipart(parts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::operations::RequestBody;
    use reqwest::Method;

    #[test]
    fn test_list_projects_carries_page() {
        let request = Operation::list_projects(3).request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "projects");
        assert_eq!(request.query, vec![("page".to_string(), "3".to_string())]);
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[test]
    fn test_update_project_only_sends_given_fields() {
        let op = Operation::UpdateProject {
            project_id: 7,
            project_name: None,
            is_shared: Some(true),
        };
        let request = op.request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "projects/7");
        assert_eq!(request.body, RequestBody::Json(json!({ "is_shared": true })));
    }

    #[test]
    fn test_send_message_encodes_stream_flag_as_integer() {
        let op = Operation::SendMessage {
            project_id: 1,
            session_id: "abc".to_string(),
            prompt: "Who is Tom Brady".to_string(),
            stream: true,
            custom_persona: Some("pirate".to_string()),
        };
        let request = op.request();
        assert_eq!(request.path, "projects/1/conversations/abc/messages");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "prompt": "Who is Tom Brady",
                "stream": 1,
                "custom_persona": "pirate",
            }))
        );
    }

    #[test]
    fn test_create_project_from_file_uses_multipart() {
        let op = Operation::CreateProject {
            project_name: "Docs".to_string(),
            source: ProjectSource::File {
                file_name: "vanka.pdf".to_string(),
                bytes: vec![1, 2, 3],
            },
        };
        let request = op.request();
        assert_eq!(
            request.body,
            RequestBody::Multipart(vec![
                FormPart::text("project_name", "Docs"),
                FormPart::file("file", "vanka.pdf", vec![1, 2, 3]),
            ])
        );
    }

    #[test]
    fn test_settings_example_questions_are_indexed() {
        let op = Operation::UpdateSettings {
            project_id: 4,
            settings: SettingsUpdate {
                default_prompt: Some("Ask away".to_string()),
                example_questions: vec!["Test1".to_string(), "Test2".to_string()],
                ..Default::default()
            },
        };
        let request = op.request();
        assert_eq!(request.path, "projects/4/settings");
        assert_eq!(
            request.body,
            RequestBody::Multipart(vec![
                FormPart::text("default_prompt", "Ask away"),
                FormPart::text("example_questions[0]", "Test1"),
                FormPart::text("example_questions[1]", "Test2"),
            ])
        );
    }

    #[test]
    fn test_report_interval_only_when_given() {
        let op = Operation::Report {
            project_id: 2,
            kind: ReportKind::Analysis,
            interval: Some(ReportInterval::Weekly),
        };
        let request = op.request();
        assert_eq!(request.path, "projects/2/reports/analysis");
        assert_eq!(request.query, vec![("interval".to_string(), "weekly".to_string())]);

        let op = Operation::Report {
            project_id: 2,
            kind: ReportKind::Traffic,
            interval: None,
        };
        assert!(op.request().query.is_empty());
    }

    #[test]
    fn test_project_id_and_name() {
        assert_eq!(Operation::project_stats(9).project_id(), Some(9));
        assert_eq!(Operation::GetUser.project_id(), None);
        assert_eq!(Operation::delete_project(1).name(), "delete_project");
    }
}
