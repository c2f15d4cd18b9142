// Outreach message generation: default templates, placeholder extraction,
// prompt building, and the single call out to the text generator.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod templates;
