//! Message generation: builds the prompts, calls the text generator once, and
//! reports which input variables show up in the output.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::llm_client::{CompletionRequest, LlmError, TextGenerator, MODEL};
use crate::messages::prompts::{build_system_prompt, build_user_prompt};
use crate::messages::templates::MessageType;

const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Inputs for one generation call.
#[derive(Debug, Clone)]
pub struct MessageInput<'a> {
    pub prospect: &'a Map<String, Value>,
    pub sender: &'a Map<String, Value>,
    pub message_type: MessageType,
    pub custom_prompt: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMessage {
    pub message: String,
    pub variables: BTreeMap<String, bool>,
}

pub async fn generate_message(
    generator: &dyn TextGenerator,
    input: &MessageInput<'_>,
) -> Result<GeneratedMessage, GenerationError> {
    let system = build_system_prompt(input.message_type);
    let prompt = build_user_prompt(
        input.prospect,
        input.sender,
        input.message_type,
        input.custom_prompt,
    );

    let request = CompletionRequest {
        system: &system,
        prompt: &prompt,
        model: MODEL,
        temperature: TEMPERATURE,
        max_tokens: MAX_OUTPUT_TOKENS,
    };

    let raw = generator.generate(&request).await?;
    let message = raw.trim().to_string();
    if message.is_empty() {
        return Err(LlmError::EmptyContent.into());
    }

    let variables = observed_variables(&message, input.prospect, input.sender);

    info!(
        "Generated {} message ({} chars, {}/{} variables observed)",
        input.message_type.as_str(),
        message.len(),
        variables.values().filter(|present| **present).count(),
        variables.len()
    );

    Ok(GeneratedMessage { message, variables })
}

/// Marks each input key present when its lowercased name occurs anywhere in the
/// lowercased message. Plain substring containment, so unrelated words can match.
pub fn observed_variables(
    message: &str,
    prospect: &Map<String, Value>,
    sender: &Map<String, Value>,
) -> BTreeMap<String, bool> {
    let haystack = message.to_lowercase();
    prospect
        .keys()
        .chain(sender.keys())
        .map(|key| (key.clone(), haystack.contains(&key.to_lowercase())))
        .collect()
}
