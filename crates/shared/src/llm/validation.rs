use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use super::contracts::{
    ComposeCapability, ComposeOutputContract, ContractError, NOTIFICATION_VARIANT_COUNT,
    output_schema, parse_contract,
};

#[derive(Debug, Error)]
pub enum OutputValidationError {
    #[error("model output is not valid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("output schema for {capability:?} failed to compile: {message}")]
    SchemaCompile {
        capability: ComposeCapability,
        message: String,
    },
    #[error("model output failed schema validation for {capability:?}: {errors:?}")]
    SchemaViolation {
        capability: ComposeCapability,
        errors: Vec<String>,
    },
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error("expected {expected} variants, model returned {actual}")]
    VariantCount { expected: usize, actual: usize },
    #[error("variant {index} is blank")]
    BlankVariant { index: usize },
    #[error("summary is blank")]
    BlankSummary,
}

impl OutputValidationError {
    /// Short label used in fallback log events.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "invalid_json",
            Self::SchemaCompile { .. } => "schema_compile",
            Self::SchemaViolation { .. } => "schema_violation",
            Self::Contract(_) => "contract_mismatch",
            Self::VariantCount { .. } => "variant_count",
            Self::BlankVariant { .. } => "blank_variant",
            Self::BlankSummary => "blank_summary",
        }
    }
}

pub fn validate_output_json(
    capability: ComposeCapability,
    raw_json: &str,
) -> Result<ComposeOutputContract, OutputValidationError> {
    let payload: Value = serde_json::from_str(raw_json)?;
    validate_output_value(capability, &payload)
}

pub fn validate_output_value(
    capability: ComposeCapability,
    payload: &Value,
) -> Result<ComposeOutputContract, OutputValidationError> {
    // Count before the schema pass so a short list reports its length rather
    // than a generic minItems violation.
    if capability == ComposeCapability::NotificationVariants
        && let Some(items) = payload.get("variants").and_then(Value::as_array)
        && items.len() != NOTIFICATION_VARIANT_COUNT
    {
        return Err(OutputValidationError::VariantCount {
            expected: NOTIFICATION_VARIANT_COUNT,
            actual: items.len(),
        });
    }

    let validator = validator_for_capability(capability)?;

    if let Err(validation_errors) = validator.validate(payload) {
        let errors = validation_errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(OutputValidationError::SchemaViolation { capability, errors });
    }

    let contract = parse_contract(capability, payload.clone())?;
    ensure_content(&contract)?;
    Ok(contract)
}

fn ensure_content(contract: &ComposeOutputContract) -> Result<(), OutputValidationError> {
    match contract {
        ComposeOutputContract::NotificationVariants(output) => {
            if output.variants.len() != NOTIFICATION_VARIANT_COUNT {
                return Err(OutputValidationError::VariantCount {
                    expected: NOTIFICATION_VARIANT_COUNT,
                    actual: output.variants.len(),
                });
            }
            if let Some(index) = output
                .variants
                .iter()
                .position(|variant| variant.trim().is_empty())
            {
                return Err(OutputValidationError::BlankVariant { index });
            }
            Ok(())
        }
        ComposeOutputContract::PastNotificationsSummary(output) => {
            if output.summary.trim().is_empty() {
                return Err(OutputValidationError::BlankSummary);
            }
            Ok(())
        }
    }
}

static NOTIFICATION_VARIANTS_VALIDATOR: LazyLock<Result<JSONSchema, String>> =
    LazyLock::new(|| {
        JSONSchema::compile(&output_schema(ComposeCapability::NotificationVariants))
            .map_err(|err| err.to_string())
    });

static PAST_NOTIFICATIONS_SUMMARY_VALIDATOR: LazyLock<Result<JSONSchema, String>> =
    LazyLock::new(|| {
        JSONSchema::compile(&output_schema(ComposeCapability::PastNotificationsSummary))
            .map_err(|err| err.to_string())
    });

fn validator_for_capability(
    capability: ComposeCapability,
) -> Result<&'static JSONSchema, OutputValidationError> {
    let validator_result = match capability {
        ComposeCapability::NotificationVariants => &*NOTIFICATION_VARIANTS_VALIDATOR,
        ComposeCapability::PastNotificationsSummary => &*PAST_NOTIFICATIONS_SUMMARY_VALIDATOR,
    };

    validator_result
        .as_ref()
        .map_err(|message| OutputValidationError::SchemaCompile {
            capability,
            message: message.clone(),
        })
}
