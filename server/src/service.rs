use async_trait::async_trait;
use harvest_core::{
    EcoRecipe, EnrichedMeal, GeneratedRecipe, GenerationClient, GenerationError, RecipeEngine,
    SearchSource,
};

/// The engine operations the HTTP layer exposes.
#[async_trait]
pub trait RecipeService: Send + Sync {
    async fn generate_recipe(&self, terms: &[String]) -> Result<GeneratedRecipe, GenerationError>;

    async fn auto_suggest(&self, terms: &[String]) -> Result<Vec<EcoRecipe>, GenerationError>;

    async fn meal_links(&self, terms: &[String]) -> Result<Vec<EnrichedMeal>, GenerationError>;

    async fn suggestions(&self, food_name: &str) -> Result<Vec<String>, GenerationError>;
}

#[async_trait]
impl<C, S> RecipeService for RecipeEngine<C, S>
where
    C: GenerationClient,
    S: SearchSource,
{
    async fn generate_recipe(&self, terms: &[String]) -> Result<GeneratedRecipe, GenerationError> {
        RecipeEngine::generate_recipe(self, terms).await
    }

    async fn auto_suggest(&self, terms: &[String]) -> Result<Vec<EcoRecipe>, GenerationError> {
        RecipeEngine::auto_suggest(self, terms).await
    }

    async fn meal_links(&self, terms: &[String]) -> Result<Vec<EnrichedMeal>, GenerationError> {
        RecipeEngine::meal_links(self, terms).await
    }

    async fn suggestions(&self, food_name: &str) -> Result<Vec<String>, GenerationError> {
        RecipeEngine::suggestions(self, food_name).await
    }
}
