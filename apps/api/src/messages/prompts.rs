// Prompt text for outreach message generation.

use serde_json::{Map, Value};

use crate::messages::templates::MessageType;

/// System prompt. Replace `{channel}` and `{word_limit}` before sending.
const SYSTEM_PROMPT_TEMPLATE: &str = "You are an expert sales copywriter who creates personalized \
    {channel} outreach messages. \
    Write in a professional, friendly tone that's concise and persuasive without being pushy.\n\n\
    Craft a message that connects the sender's value proposition with the prospect's needs. \
    The message should be personalized based on the prospect's information. \
    Do not use placeholder text like {{prospect_company}}. Use the actual values provided.\n\n\
    Keep the message under {word_limit} words.";

const USER_PROMPT_HEADER: &str =
    "Create a personalized sales outreach message with the following information:\n\nPROSPECT INFORMATION:";

const SENDER_SECTION_HEADER: &str = "\n\nSENDER INFORMATION:";

const CUSTOM_SECTION_HEADER: &str = "\n\nADDITIONAL INSTRUCTIONS:\n";

const EMAIL_FORMAT_DIRECTIVE: &str =
    "\n\nFormat the message as a complete email with subject line and signature.";

const LINKEDIN_FORMAT_DIRECTIVE: &str =
    "\n\nFormat the message as a concise LinkedIn connection request or InMail.";

fn word_limit(message_type: MessageType) -> u32 {
    match message_type {
        MessageType::Email => 150,
        MessageType::LinkedIn => 100,
    }
}

pub fn build_system_prompt(message_type: MessageType) -> String {
    SYSTEM_PROMPT_TEMPLATE
        .replace("{channel}", message_type.display_name())
        .replace("{word_limit}", &word_limit(message_type).to_string())
}

/// Builds the user prompt from prospect and sender fields, in map order.
/// Fields with empty values are left out.
pub fn build_user_prompt(
    prospect: &Map<String, Value>,
    sender: &Map<String, Value>,
    message_type: MessageType,
    custom_prompt: Option<&str>,
) -> String {
    let mut prompt = String::from(USER_PROMPT_HEADER);
    push_fields(&mut prompt, prospect);

    prompt.push_str(SENDER_SECTION_HEADER);
    push_fields(&mut prompt, sender);

    if let Some(custom) = custom_prompt.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(CUSTOM_SECTION_HEADER);
        prompt.push_str(custom);
    }

    prompt.push_str(match message_type {
        MessageType::Email => EMAIL_FORMAT_DIRECTIVE,
        MessageType::LinkedIn => LINKEDIN_FORMAT_DIRECTIVE,
    });

    prompt
}

fn push_fields(prompt: &mut String, fields: &Map<String, Value>) {
    for (key, value) in fields {
        if let Some(rendered) = render_value(value) {
            prompt.push('\n');
            prompt.push_str(key);
            prompt.push_str(": ");
            prompt.push_str(&rendered);
        }
    }
}

/// Renders a field value for the prompt, or `None` when the value counts as empty.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}
