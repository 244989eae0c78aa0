//! Request and result types shared by every pipeline variant.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Ingredient terms supplied by the caller.
///
/// Terms keep their input order so logs read the way the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    terms: Vec<String>,
}

impl GenerationRequest {
    /// Trim every term and drop blanks. No usable term is `InvalidInput`.
    pub fn new<I, S>(terms: I) -> Result<Self, GenerationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return Err(GenerationError::InvalidInput(
                "At least one ingredient is required".to_string(),
            ));
        }

        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms joined the way prompts and defaults present them: `"apple, bread"`.
    pub fn joined(&self) -> String {
        self.terms.join(", ")
    }
}

/// A single full recipe, as produced by the single-recipe variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GeneratedRecipe {
    pub title: String,
    pub cooking_time_minutes: u32,
    pub instructions: String,
    pub ingredients_used: String,
    pub eco_tip: String,
}

/// One entry of the multi-recipe variant, with its sustainability notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EcoRecipe {
    pub title: String,
    pub instructions: String,
    pub ingredients_used: String,
    pub co2_saved: String,
    pub eco_benefit: String,
}

/// A meal title paired with a link to a recipe page.
///
/// `recipe_link` is always an absolute URL: a matched search result or the
/// fallback search-engine query for `meal_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EnrichedMeal {
    pub meal_name: String,
    pub recipe_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_trims_and_drops_blank_terms() {
        let request = GenerationRequest::new(["  apple ", "", "bread", "   "]).unwrap();
        assert_eq!(request.terms(), &["apple".to_string(), "bread".to_string()]);
        assert_eq!(request.joined(), "apple, bread");
    }

    #[test]
    fn request_without_terms_is_invalid_input() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            GenerationRequest::new(empty),
            Err(GenerationError::InvalidInput(_))
        ));
        assert!(matches!(
            GenerationRequest::new([" ", "\t"]),
            Err(GenerationError::InvalidInput(_))
        ));
    }

    #[test]
    fn request_preserves_input_order() {
        let request = GenerationRequest::new(["zucchini", "apple", "milk"]).unwrap();
        assert_eq!(request.joined(), "zucchini, apple, milk");
    }
}
