use crate::composer::NotificationTone;

pub const FALLBACK_PREFIX_CHARS: usize = 30;

/// Placeholder variants used when the model is unavailable or off-contract.
/// Pure: identical input always yields the identical ordered triple.
pub fn fallback_variants(base_message: &str, tone: NotificationTone) -> [String; 3] {
    let prefix = truncated_prefix(base_message.trim(), FALLBACK_PREFIX_CHARS);
    [1, 2, 3].map(|ordinal| format!("{prefix} ({tone} tone) - Variant {ordinal}"))
}

fn truncated_prefix(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &message[..byte_index]),
        None => message.to_string(),
    }
}
