//! OpenAI API command line client
//!
//! `openai-client models` lists available models,
//! `openai-client chat <prompt...>` sends a single user message

use anyhow::{Context, Result};
use tracing::{info, warn};

use openai_client::models::{ChatRequest, Message};
use openai_client::utils::logging::init_logging;
use openai_client::{ClientFile, OpenAiClient, Settings};

const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings()?;
    init_logging(&settings.logging.level, &settings.logging.format);
    info!("{}", openai_client::version_info());

    let client = OpenAiClient::from_settings(&settings).context("Failed to create API client")?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("models") => list_models(&client).await,
        Some("chat") => {
            let prompt = args.collect::<Vec<_>>().join(" ");
            if prompt.trim().is_empty() {
                anyhow::bail!("Usage: openai-client chat <prompt...>");
            }
            chat(&client, prompt).await
        }
        _ => anyhow::bail!("Usage: openai-client <models | chat <prompt...>>"),
    }
}

/// Environment first, then the config file
fn load_settings() -> Result<Settings> {
    match Settings::new() {
        Ok(settings) => Ok(settings),
        Err(env_error) => {
            let file = ClientFile::load_default()
                .with_context(|| format!("No usable environment settings ({})", env_error))?;
            file.into_settings().context("Invalid configuration file")
        }
    }
}

async fn list_models(client: &OpenAiClient) -> Result<()> {
    let models = client.list_models_async().await.into_result()?;
    for id in models.ids() {
        println!("{}", id);
    }
    Ok(())
}

async fn chat(client: &OpenAiClient, prompt: String) -> Result<()> {
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
    let request = ChatRequest::builder()
        .model(model)
        .message(Message::user(prompt))
        .build();

    let response = client.chat_async(request).await.into_result()?;
    match response.first_message() {
        Some(message) => println!("{}", message.content),
        None => warn!("Response contained no choices"),
    }

    info!(
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "Token usage"
    );
    Ok(())
}
