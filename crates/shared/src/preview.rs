use serde::{Deserialize, Serialize};

use crate::composer::{ChannelSelection, NotificationChannel};
use crate::notifications::GenerationResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOption {
    pub label: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewGroup {
    /// `None` when no channel was selected; the group is then generic.
    pub channel: Option<NotificationChannel>,
    pub title: String,
    pub options: Vec<PreviewOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSet {
    pub groups: Vec<PreviewGroup>,
}

pub fn build_previews(result: &GenerationResult, channels: &ChannelSelection) -> PreviewSet {
    let active = channels.active_channels();
    if active.is_empty() {
        return PreviewSet {
            groups: vec![PreviewGroup {
                channel: None,
                title: "Previews".to_string(),
                options: labelled_options(result, "Variant"),
            }],
        };
    }

    let groups = active
        .into_iter()
        .map(|channel| PreviewGroup {
            channel: Some(channel),
            title: format!("{} Previews", channel_title(channel)),
            options: labelled_options(result, "Option"),
        })
        .collect();

    PreviewSet { groups }
}

fn labelled_options(result: &GenerationResult, label: &str) -> Vec<PreviewOption> {
    result
        .variants
        .iter()
        .enumerate()
        .map(|(index, content)| PreviewOption {
            label: format!("{label} {}", index + 1),
            content: content.clone(),
        })
        .collect()
}

fn channel_title(channel: NotificationChannel) -> &'static str {
    match channel {
        NotificationChannel::Push => "Push",
        NotificationChannel::Email => "Email",
        NotificationChannel::Sms => "SMS",
    }
}

#[cfg(test)]
mod tests {
    use super::build_previews;
    use crate::composer::{ChannelSelection, NotificationChannel};
    use crate::notifications::GenerationResult;

    fn result() -> GenerationResult {
        GenerationResult {
            variants: ["one".to_string(), "two".to_string(), "three".to_string()],
        }
    }

    #[test]
    fn groups_variants_per_selected_channel() {
        let previews = build_previews(
            &result(),
            &ChannelSelection {
                push: true,
                email: false,
                sms: true,
            },
        );

        let channels = previews
            .groups
            .iter()
            .map(|group| group.channel)
            .collect::<Vec<_>>();
        assert_eq!(
            channels,
            vec![Some(NotificationChannel::Push), Some(NotificationChannel::Sms)]
        );
        assert_eq!(previews.groups[1].title, "SMS Previews");
        assert_eq!(previews.groups[1].options[2].label, "Option 3");
        assert_eq!(previews.groups[1].options[2].content, "three");
    }

    #[test]
    fn no_channel_yields_single_generic_group() {
        let previews = build_previews(&result(), &ChannelSelection::default());

        assert_eq!(previews.groups.len(), 1);
        assert!(previews.groups[0].channel.is_none());
        let labels = previews.groups[0]
            .options
            .iter()
            .map(|option| option.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Variant 1", "Variant 2", "Variant 3"]);
    }
}
