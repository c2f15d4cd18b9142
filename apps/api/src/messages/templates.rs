//! Message templates: default template text, placeholder extraction, and the
//! `MessageTemplate` value object.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Matches `{{name}}` placeholders. No nesting, no escaping.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("valid placeholder regex"));

/// Outreach channel a message or template targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Email,
    LinkedIn,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Email => "email",
            MessageType::LinkedIn => "linkedin",
        }
    }

    /// Channel name as written in prose.
    pub fn display_name(self) -> &'static str {
        match self {
            MessageType::Email => "email",
            MessageType::LinkedIn => "LinkedIn",
        }
    }

    /// The read-only default template body for this channel.
    pub fn default_template(self) -> &'static str {
        match self {
            MessageType::Email => DEFAULT_EMAIL_TEMPLATE,
            MessageType::LinkedIn => DEFAULT_LINKEDIN_TEMPLATE,
        }
    }
}

pub const DEFAULT_EMAIL_TEMPLATE: &str = r#"
Subject: Let's explore how {{company_name}} can improve {{prospect_pain_point}}

Hi {{first_name}},

I hope this email finds you well. I was exploring {{prospect_company}} and was impressed by your work on {{prospect_company_achievement}}.

At {{company_name}}, we've been helping companies like {{similar_company}} to {{value_proposition}}. I'd love to share some ideas on how we could potentially help {{prospect_company}} with {{prospect_pain_point}}.

Would you be open to a 15-minute call next week to discuss this further?

Best regards,
{{sender_name}}
{{sender_position}}
{{company_name}}
{{sender_phone}}
"#;

pub const DEFAULT_LINKEDIN_TEMPLATE: &str = r#"
Hi {{first_name}},

I noticed your work at {{prospect_company}} particularly your focus on {{prospect_role_focus}}. I'm reaching out because we've helped similar {{prospect_industry}} professionals achieve {{value_proposition}}.

Would you be open to connecting to explore potential synergies?

Best,
{{sender_name}} from {{company_name}}
"#;

/// Returns the distinct placeholder names referenced in `content`.
pub fn extract_variables(content: &str) -> BTreeSet<String> {
    PLACEHOLDER_RE
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub template_type: MessageType,
    pub variables: Vec<String>,
    pub user_id: String,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MessageTemplate {
    /// Builds a template owned by `user_id`, deriving its variable list from `content`.
    pub fn new(
        name: String,
        content: String,
        template_type: MessageType,
        user_id: String,
        is_default: bool,
        now_ms: i64,
    ) -> Self {
        let variables = extract_variables(&content).into_iter().collect();
        Self {
            id: Uuid::new_v4(),
            name,
            content,
            template_type,
            variables,
            user_id,
            is_default,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}
