use serde_json::Value;

use super::contracts::{ComposeCapability, output_schema};
use crate::composer::NotificationTone;

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub capability: ComposeCapability,
    pub system_prompt: &'static str,
    pub temperature: f64,
    pub output_schema: Value,
}

const VARIANTS_SYSTEM_PROMPT: &str =
    "You write short, ready-to-send notification copy. Return JSON only, with no markdown fences.";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are an expert at summarizing notifications. Return JSON only, with no markdown fences.";

const VARIANTS_PREAMBLE: &str = "You are an AI assistant specializing in generating notification variants.

Based on the user's base message and selected tone, generate three different notification variants.";

const VARIANTS_OUTPUT_EXAMPLE: &str =
    r#"{"variants": ["<variant 1>", "<variant 2>", "<variant 3>"]}"#;

const SUMMARY_PREAMBLE: &str = "Given the following list of past notifications, create a concise summary of what worked and what didn't.";

const SUMMARY_OUTPUT_EXAMPLE: &str = r#"{"summary": "<summary>"}"#;

pub fn template_for_capability(capability: ComposeCapability) -> PromptTemplate {
    let (system_prompt, temperature) = match capability {
        ComposeCapability::NotificationVariants => (VARIANTS_SYSTEM_PROMPT, 0.7),
        ComposeCapability::PastNotificationsSummary => (SUMMARY_SYSTEM_PROMPT, 0.2),
    };

    PromptTemplate {
        capability,
        system_prompt,
        temperature,
        output_schema: output_schema(capability),
    }
}

/// Fills the variants template. Values are substituted literally.
pub fn render_variants_prompt(base_message: &str, tone: NotificationTone) -> String {
    format!(
        "{VARIANTS_PREAMBLE}\n\nBase Message: {base_message}\nTone: {tone}\n\nRespond with exactly three variants in this shape:\n{VARIANTS_OUTPUT_EXAMPLE}",
        tone = tone.as_str(),
    )
}

pub fn render_summary_prompt(past_notifications: &str) -> String {
    format!(
        "{SUMMARY_PREAMBLE}\n\nPast Notifications: {past_notifications}\n\nRespond in this shape:\n{SUMMARY_OUTPUT_EXAMPLE}"
    )
}
