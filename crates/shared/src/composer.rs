use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_BASE_MESSAGE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationTone {
    Formal,
    Informal,
    Urgent,
    Friendly,
    Playful,
    Professional,
}

impl NotificationTone {
    pub const ALL: [Self; 6] = [
        Self::Formal,
        Self::Informal,
        Self::Urgent,
        Self::Friendly,
        Self::Playful,
        Self::Professional,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Informal => "informal",
            Self::Urgent => "urgent",
            Self::Friendly => "friendly",
            Self::Playful => "playful",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for NotificationTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tone '{0}'")]
pub struct UnknownTone(pub String);

impl FromStr for NotificationTone {
    type Err = UnknownTone;

    /// Exact, case-sensitive match against the lower-case tone names.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str() == value)
            .ok_or_else(|| UnknownTone(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Push,
    Email,
    Sms,
}

impl NotificationChannel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSelection {
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub sms: bool,
}

impl ChannelSelection {
    /// Selected channels in display order: push, email, sms.
    pub fn active_channels(&self) -> Vec<NotificationChannel> {
        [
            (self.push, NotificationChannel::Push),
            (self.email, NotificationChannel::Email),
            (self.sms, NotificationChannel::Sms),
        ]
        .into_iter()
        .filter_map(|(selected, channel)| selected.then_some(channel))
        .collect()
    }

    pub fn any_selected(&self) -> bool {
        self.push || self.email || self.sms
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerFormData {
    pub base_message: String,
    pub tone: NotificationTone,
    pub channels: ChannelSelection,
}

impl Default for ComposerFormData {
    fn default() -> Self {
        Self {
            base_message: String::new(),
            tone: NotificationTone::Formal,
            channels: ChannelSelection {
                push: true,
                email: false,
                sms: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormFieldError {
    pub field: &'static str,
    pub message: &'static str,
}

pub fn validate_composer_form(form: &ComposerFormData) -> Result<(), Vec<FormFieldError>> {
    let mut errors = Vec::new();

    if form.base_message.chars().count() < MIN_BASE_MESSAGE_CHARS {
        errors.push(FormFieldError {
            field: "baseMessage",
            message: "Base message must be at least 10 characters long.",
        });
    }

    if !form.channels.any_selected() {
        errors.push(FormFieldError {
            field: "channels",
            message: "At least one channel must be selected.",
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
