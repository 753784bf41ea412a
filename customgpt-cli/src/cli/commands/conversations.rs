//! Conversation and message commands

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use super::{PageArgs, list_collection, print_data};
use crate::api::{ApiResponse, Operation, sse};
use crate::cli::AppContext;
use crate::cli::output::to_json;

#[derive(Args, Debug)]
pub struct ListConversationsArgs {
    #[arg(long)]
    pub project_id: u64,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(Args, Debug)]
pub struct CreateConversationArgs {
    #[arg(long)]
    pub project_id: u64,
    /// Conversation name
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct UpdateConversationArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub session_id: String,
    /// New conversation name
    #[arg(long)]
    pub name: String,
}

/// Identifies one conversation
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub session_id: String,
}

#[derive(Args, Debug)]
pub struct SendMessageArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub session_id: String,
    /// Message to send
    #[arg(long)]
    pub prompt: String,
    /// Stream the answer as it is produced
    #[arg(long)]
    pub stream: bool,
    /// Persona instructions for this message only
    #[arg(long)]
    pub persona: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListMessagesArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub session_id: String,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetCitationArgs {
    #[arg(long)]
    pub project_id: u64,
    #[arg(long)]
    pub citation_id: u64,
}

pub async fn list_conversations(ctx: &AppContext, args: ListConversationsArgs) -> Result<()> {
    let project_id = args.project_id;
    list_collection(ctx, "conversations", None, &args.paging, |page| {
        Operation::ListConversations { project_id, page }
    })
    .await
}

pub async fn create_conversation(ctx: &AppContext, args: CreateConversationArgs) -> Result<()> {
    print_data(ctx, Operation::CreateConversation {
        project_id: args.project_id,
        name: args.name,
    })
    .await
}

pub async fn update_conversation(ctx: &AppContext, args: UpdateConversationArgs) -> Result<()> {
    print_data(ctx, Operation::UpdateConversation {
        project_id: args.project_id,
        session_id: args.session_id,
        name: args.name,
    })
    .await
}

pub async fn delete_conversation(ctx: &AppContext, args: SessionArgs) -> Result<()> {
    print_data(ctx, Operation::DeleteConversation {
        project_id: args.project_id,
        session_id: args.session_id,
    })
    .await
}

pub async fn send_message(ctx: &AppContext, args: SendMessageArgs) -> Result<()> {
    let operation = Operation::SendMessage {
        project_id: args.project_id,
        session_id: args.session_id,
        prompt: args.prompt,
        stream: args.stream,
        custom_persona: args.persona,
    };

    if !args.stream {
        return print_data(ctx, operation).await;
    }

    let response = ctx
        .executor
        .try_execute(&operation)
        .await
        .context("send_message failed")?;
    let answer = streamed_answer(&response).context("send_message failed")?;

    let mut stdout = std::io::stdout().lock();
    for chunk in answer {
        write!(stdout, "{}", chunk)?;
    }
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Text chunks of a streamed answer, in order.
///
/// Event data that is JSON contributes its `message` field; other data is
/// passed through verbatim.
fn streamed_answer(response: &ApiResponse) -> Result<Vec<String>> {
    if !response.is_success() {
        // surfaces the server's message
        response.data::<Value>()?;
    }

    let chunks = sse::parse_events(&response.text())
        .into_iter()
        .filter_map(|event| match serde_json::from_str::<Value>(&event.data) {
            Ok(Value::Object(object)) => object
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            Ok(other) => to_json(&other).ok(),
            Err(_) => Some(event.data),
        })
        .collect();
    Ok(chunks)
}

pub async fn list_messages(ctx: &AppContext, args: ListMessagesArgs) -> Result<()> {
    let project_id = args.project_id;
    let session_id = args.session_id;
    list_collection(ctx, "messages", Some(MESSAGES_KEY), &args.paging, |page| {
        messages_page(project_id, &session_id, page)
    })
    .await
}

/// Key wrapping the message paginator, next to the conversation itself
const MESSAGES_KEY: &str = "messages";

fn messages_page(project_id: u64, session_id: &str, page: u32) -> Operation {
    Operation::ListMessages {
        project_id,
        session_id: session_id.to_string(),
        page,
    }
}

pub async fn get_citation(ctx: &AppContext, args: GetCitationArgs) -> Result<()> {
    print_data(ctx, Operation::GetCitation {
        project_id: args.project_id,
        citation_id: args.citation_id,
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Executor, ResilienceConfig};
    use crate::cli::commands::fetch_single_page;
    use crate::services::pagination::fetch_all_pages;
    use crate::testing::{MockTransport, RecordingSleeper, json_response};
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use std::sync::Arc;

    fn messages_transport() -> Arc<MockTransport> {
        Arc::new(MockTransport::new(|_, _| {
            Ok(json_response(
                200,
                json!({
                    "status": "success",
                    "data": {
                        "conversation": { "session_id": "abc" },
                        "messages": {
                            "current_page": 1,
                            "last_page": 1,
                            "data": [{ "id": 1 }, { "id": 2 }],
                            "total": 2
                        }
                    }
                }),
            ))
        }))
    }

    fn context(transport: Arc<MockTransport>) -> AppContext {
        AppContext::new(Executor::with_sleeper(
            transport,
            Arc::new(RecordingSleeper::default()),
            ResilienceConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_all_message_pages_unwrap_container() {
        let transport = messages_transport();
        let ctx = context(transport.clone());

        let items: Vec<Value> =
            fetch_all_pages(&ctx.executor, "messages", Some(MESSAGES_KEY), |page| {
                messages_page(5, "abc", page)
            })
            .await;

        assert_eq!(items, vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        assert_eq!(transport.calls_to("projects/5/conversations/abc/messages"), 1);
    }

    #[tokio::test]
    async fn test_single_message_page_unwraps_container() {
        let ctx = context(messages_transport());

        let items: Vec<Value> = fetch_single_page(
            &ctx,
            "messages",
            Some(MESSAGES_KEY),
            &messages_page(5, "abc", 1),
        )
        .await
        .unwrap();

        assert_eq!(items.len(), 2);
    }

    fn stream_response(body: &str) -> ApiResponse {
        ApiResponse::new(StatusCode::OK, HeaderMap::new(), body)
    }

    #[test]
    fn test_streamed_answer_collects_messages() {
        let response = stream_response(
            "event: progress\ndata: {\"status\":\"progress\",\"message\":\"Hello\"}\n\n\
             event: progress\ndata: {\"status\":\"progress\",\"message\":\" world\"}\n\n\
             event: end\ndata: {\"status\":\"finish\"}\n\n",
        );
        assert_eq!(streamed_answer(&response).unwrap(), vec!["Hello", " world"]);
    }

    #[test]
    fn test_streamed_answer_passes_plain_data_through() {
        let response = stream_response(": keep-alive\ndata: plain text\n\n");
        assert_eq!(streamed_answer(&response).unwrap(), vec!["plain text"]);
    }

    #[test]
    fn test_streamed_answer_error_status() {
        let response = ApiResponse::new(
            StatusCode::BAD_REQUEST,
            HeaderMap::new(),
            r#"{"status":"error","data":{"message":"Prompt is required"}}"#,
        );
        let err = streamed_answer(&response).unwrap_err();
        assert!(format!("{:#}", err).contains("Prompt is required"));
    }
}
