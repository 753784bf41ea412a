//! Project settings commands

use anyhow::Result;
use clap::Args;

use super::{ProjectArgs, print_data};
use crate::api::{Operation, SettingsUpdate};
use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct UpdateSettingsArgs {
    #[arg(long)]
    pub project_id: u64,
    /// Placeholder shown in the chat input
    #[arg(long)]
    pub default_prompt: Option<String>,
    /// Example question (repeatable)
    #[arg(long = "example-question", value_name = "QUESTION")]
    pub example_questions: Vec<String>,
    /// Where answers may come from (e.g. own_content, openai_content)
    #[arg(long)]
    pub response_source: Option<String>,
    /// Language of the chatbot messages (e.g. en)
    #[arg(long)]
    pub chatbot_msg_lang: Option<String>,
    #[arg(long)]
    pub persona_instructions: Option<String>,
}

impl From<UpdateSettingsArgs> for SettingsUpdate {
    fn from(args: UpdateSettingsArgs) -> Self {
        Self {
            default_prompt: args.default_prompt,
            example_questions: args.example_questions,
            response_source: args.response_source,
            chatbot_msg_lang: args.chatbot_msg_lang,
            persona_instructions: args.persona_instructions,
        }
    }
}

pub async fn get_settings(ctx: &AppContext, args: ProjectArgs) -> Result<()> {
    print_data(ctx, Operation::GetSettings {
        project_id: args.project_id,
    })
    .await
}

pub async fn update_settings(ctx: &AppContext, args: UpdateSettingsArgs) -> Result<()> {
    let project_id = args.project_id;
    let settings = SettingsUpdate::from(args);
    if settings.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one setting");
    }
    print_data(ctx, Operation::UpdateSettings {
        project_id,
        settings,
    })
    .await
}
