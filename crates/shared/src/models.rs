use serde::{Deserialize, Serialize};

use crate::composer::{ChannelSelection, ComposerFormData, NotificationTone, UnknownTone};
use crate::presets::Preset;
use crate::preview::PreviewSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Composer form as submitted. The tone stays a raw string so an unknown
/// value is reported as `invalid_tone` instead of a body decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    #[serde(default)]
    pub base_message: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub channels: ChannelSelection,
}

impl ComposeRequest {
    pub fn into_form(self) -> Result<ComposerFormData, UnknownTone> {
        Ok(ComposerFormData {
            tone: self.tone.parse()?,
            base_message: self.base_message,
            channels: self.channels,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeResponse {
    pub variants: [String; 3],
    pub tone: NotificationTone,
    pub previews: PreviewSet,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePresetRequest {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub form: ComposerFormData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePresetResponse {
    #[serde(flatten)]
    pub preset: Preset,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPresetsResponse {
    pub items: Vec<Preset>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ComposeRequest;
    use crate::composer::NotificationTone;

    #[test]
    fn compose_request_parses_known_tone_and_keeps_unknown_one() {
        let request: ComposeRequest = serde_json::from_value(json!({
            "baseMessage": "Store opens at 9am today",
            "tone": "informal",
            "channels": { "sms": true }
        }))
        .expect("request should deserialize");
        let form = request.into_form().expect("known tone");
        assert_eq!(form.tone, NotificationTone::Informal);
        assert!(form.channels.sms && !form.channels.push);

        let request: ComposeRequest =
            serde_json::from_value(json!({ "baseMessage": "x", "tone": "sarcastic" }))
                .expect("request should deserialize");
        let err = request.into_form().expect_err("unknown tone");
        assert_eq!(err.0, "sarcastic");
    }
}
