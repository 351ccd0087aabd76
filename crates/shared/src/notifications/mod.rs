pub mod fallback;
pub mod summary;
pub mod variants;

pub use fallback::{FALLBACK_PREFIX_CHARS, fallback_variants};
pub use summary::{PastNotificationsSummarizer, SummaryError, SummaryRequest, SummaryResult};
pub use variants::{
    FallbackReason, GenerationResult, VariantGeneration, VariantGenerationService,
    VariantRequest, VariantRequestError, VariantSource,
};
