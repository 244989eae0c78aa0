pub mod ai;
pub mod coerce;
pub mod credentials;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod search;
pub mod types;

pub use ai::{
    AiConfig, ConfigError, FakeGenerationClient, FakeReply, GenerationClient, OpenRouterClient,
};
pub use credentials::{Credential, CredentialPool};
pub use engine::{
    DefaultEngine, RecipeEngine, ECO_RECIPE_COUNT, MEAL_NAME_COUNT, SUGGESTION_COUNT,
};
pub use enrichment::{fallback_search_url, ClaimedUrls, Enricher};
pub use error::{FetchError, GenerationError, ProviderError};
pub use http::{HttpClient, MockClient, MockResponse, RateLimitedClient};
pub use pipeline::{FallbackPipeline, PipelineOutcome};
pub use search::{
    AllRecipesSearch, FakeSearch, SearchCandidate, SearchConfig, SearchError, SearchSource,
};
pub use types::{EcoRecipe, EnrichedMeal, GeneratedRecipe, GenerationRequest};
