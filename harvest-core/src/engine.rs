//! The recipe engine: one entry point per generation variant.

use std::collections::HashSet;

use crate::ai::prompts::SchemaDescriptor;
use crate::ai::{AiConfig, GenerationClient, OpenRouterClient};
use crate::coerce::{coerce_list, coerce_object, coerce_string_list};
use crate::enrichment::Enricher;
use crate::error::GenerationError;
use crate::http::RateLimitedClient;
use crate::pipeline::FallbackPipeline;
use crate::search::{AllRecipesSearch, SearchConfig, SearchSource};
use crate::types::{EcoRecipe, EnrichedMeal, GeneratedRecipe, GenerationRequest};

/// Eco recipes returned by [`RecipeEngine::auto_suggest`].
pub const ECO_RECIPE_COUNT: usize = 3;
/// Meal names generated by [`RecipeEngine::meal_links`].
pub const MEAL_NAME_COUNT: usize = 5;
/// Titles returned by [`RecipeEngine::suggestions`].
pub const SUGGESTION_COUNT: usize = 3;

/// Engine wired to the OpenRouter API and allrecipes.com search.
pub type DefaultEngine = RecipeEngine<OpenRouterClient, AllRecipesSearch<RateLimitedClient>>;

pub struct RecipeEngine<C, S> {
    pipeline: FallbackPipeline<C>,
    enricher: Enricher<S>,
}

impl<C: GenerationClient, S: SearchSource> RecipeEngine<C, S> {
    pub fn new(pipeline: FallbackPipeline<C>, enricher: Enricher<S>) -> Self {
        Self { pipeline, enricher }
    }

    pub fn pipeline(&self) -> &FallbackPipeline<C> {
        &self.pipeline
    }

    pub fn enricher(&self) -> &Enricher<S> {
        &self.enricher
    }

    /// One recipe that uses the given ingredients.
    pub async fn generate_recipe<T: AsRef<str>>(
        &self,
        terms: &[T],
    ) -> Result<GeneratedRecipe, GenerationError> {
        let request = GenerationRequest::new(terms)?;
        let outcome = self
            .pipeline
            .run(request.terms(), &SchemaDescriptor::recipe(), |raw| {
                coerce_object(raw, &request)
            })
            .await?;
        Ok(outcome.value)
    }

    /// Low-waste recipes with their environmental benefit.
    pub async fn auto_suggest<T: AsRef<str>>(
        &self,
        terms: &[T],
    ) -> Result<Vec<EcoRecipe>, GenerationError> {
        let request = GenerationRequest::new(terms)?;
        let outcome = self
            .pipeline
            .run(
                request.terms(),
                &SchemaDescriptor::eco_recipes(ECO_RECIPE_COUNT),
                |raw| coerce_list::<EcoRecipe>(raw, &request),
            )
            .await?;

        let mut recipes = outcome.value;
        recipes.truncate(ECO_RECIPE_COUNT);
        Ok(recipes)
    }

    /// Meal names for the ingredients, each paired with a recipe link.
    pub async fn meal_links<T: AsRef<str>>(
        &self,
        terms: &[T],
    ) -> Result<Vec<EnrichedMeal>, GenerationError> {
        let request = GenerationRequest::new(terms)?;
        let outcome = self
            .pipeline
            .run(
                request.terms(),
                &SchemaDescriptor::meal_names(MEAL_NAME_COUNT),
                coerce_string_list,
            )
            .await?;

        let meals = distinct_names(outcome.value, MEAL_NAME_COUNT);
        tracing::debug!(meals = meals.len(), "Enriching meal names");
        Ok(self.enricher.enrich(&meals).await)
    }

    /// Dish titles featuring a single food.
    pub async fn suggestions(&self, food_name: &str) -> Result<Vec<String>, GenerationError> {
        let request = GenerationRequest::new([food_name])?;
        let outcome = self
            .pipeline
            .run(
                request.terms(),
                &SchemaDescriptor::suggestions(SUGGESTION_COUNT),
                coerce_string_list,
            )
            .await?;

        Ok(distinct_names(outcome.value, SUGGESTION_COUNT))
    }
}

impl DefaultEngine {
    /// Build the production engine from loaded configuration.
    pub fn from_config(ai: &AiConfig, search: &SearchConfig) -> Result<Self, reqwest::Error> {
        let pipeline = FallbackPipeline::new(
            ai.credentials.clone(),
            OpenRouterClient::from_config(ai)?,
            ai.timeout,
        );

        let http = RateLimitedClient::builder()
            .rate_limit_ms(search.rate_limit_ms)
            .timeout(search.timeout)
            .build()?;
        let source = AllRecipesSearch::new(http, search.base_url.clone());

        Ok(Self::new(pipeline, Enricher::from_config(source, search)))
    }
}

/// Keep the first `limit` names, skipping case-insensitive repeats.
fn distinct_names(names: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .take(limit)
        .collect()
}
