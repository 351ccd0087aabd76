use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const NOTIFICATION_VARIANT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComposeCapability {
    NotificationVariants,
    PastNotificationsSummary,
}

impl ComposeCapability {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotificationVariants => "notification_variants",
            Self::PastNotificationsSummary => "past_notifications_summary",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotificationVariantsOutput {
    /// Exactly three candidate notification texts, in display order.
    #[schemars(length(min = 3, max = 3))]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PastNotificationsSummaryOutput {
    pub summary: String,
}

#[derive(Debug, Clone)]
pub enum ComposeOutputContract {
    NotificationVariants(NotificationVariantsOutput),
    PastNotificationsSummary(PastNotificationsSummaryOutput),
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("output contract payload is invalid: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub fn output_schema(capability: ComposeCapability) -> Value {
    match capability {
        ComposeCapability::NotificationVariants => {
            serde_json::to_value(schema_for!(NotificationVariantsOutput))
                .expect("notification variants schema should be serializable")
        }
        ComposeCapability::PastNotificationsSummary => {
            serde_json::to_value(schema_for!(PastNotificationsSummaryOutput))
                .expect("past notifications summary schema should be serializable")
        }
    }
}

pub fn parse_contract(
    capability: ComposeCapability,
    payload: Value,
) -> Result<ComposeOutputContract, ContractError> {
    match capability {
        ComposeCapability::NotificationVariants => {
            let contract: NotificationVariantsOutput = serde_json::from_value(payload)?;
            Ok(ComposeOutputContract::NotificationVariants(contract))
        }
        ComposeCapability::PastNotificationsSummary => {
            let contract: PastNotificationsSummaryOutput = serde_json::from_value(payload)?;
            Ok(ComposeOutputContract::PastNotificationsSummary(contract))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ComposeCapability, output_schema};

    #[test]
    fn variants_schema_pins_item_count() {
        let schema = output_schema(ComposeCapability::NotificationVariants);
        let variants = &schema["properties"]["variants"];

        assert_eq!(variants["type"], "array");
        assert_eq!(variants["minItems"], 3);
        assert_eq!(variants["maxItems"], 3);
        assert_eq!(variants["items"]["type"], "string");
        assert!(
            schema["required"]
                .as_array()
                .is_some_and(|fields| fields.iter().any(|field| field == "variants"))
        );
    }
}
