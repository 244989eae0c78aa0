//! End-to-end runs of the recipe engine against scripted collaborators.

use std::time::Duration;

use harvest_core::{
    fallback_search_url, AllRecipesSearch, CredentialPool, Enricher, FakeGenerationClient,
    FakeReply, FakeSearch, FallbackPipeline, GenerationError, MockClient, RecipeEngine,
};
use url::Url;

const KEYS: &str = "key-a,key-b,key-c";

fn pipeline(client: FakeGenerationClient) -> FallbackPipeline<FakeGenerationClient> {
    FallbackPipeline::new(
        CredentialPool::from_comma_separated(KEYS).unwrap(),
        client,
        Duration::from_secs(20),
    )
}

fn offline_engine(client: FakeGenerationClient) -> RecipeEngine<FakeGenerationClient, FakeSearch> {
    RecipeEngine::new(
        pipeline(client),
        Enricher::new(FakeSearch::new(), Duration::from_secs(10), 4),
    )
}

#[tokio::test]
async fn all_keys_failing_reports_last_error() {
    let client = FakeGenerationClient::new()
        .with_default_reply(FakeReply::Fail("HTTP 429: quota exceeded".to_string()));
    let engine = offline_engine(client);

    let err = engine.generate_recipe(&["apple", "bread"]).await.unwrap_err();

    assert_eq!(
        err,
        GenerationError::AllProvidersExhausted {
            attempts: 3,
            last_error: "HTTP 429: quota exceeded".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "All API keys failed. Last error: HTTP 429: quota exceeded"
    );

    let mut tried = engine.pipeline().client().attempts();
    tried.sort();
    assert_eq!(tried, vec!["key-a", "key-b", "key-c"]);
}

#[tokio::test]
async fn fenced_partial_recipe_is_filled_with_defaults() {
    let client = FakeGenerationClient::new().with_default_reply(FakeReply::Text(
        "```json\n{\"title\":\"Toast\"}\n```".to_string(),
    ));
    let engine = offline_engine(client);

    let recipe = engine.generate_recipe(&["apple", "bread"]).await.unwrap();

    assert_eq!(recipe.title, "Toast");
    assert_eq!(recipe.instructions, "No instructions provided.");
    assert_eq!(recipe.ingredients_used, "apple, bread");
    assert_eq!(recipe.cooking_time_minutes, 30);
    assert_eq!(engine.pipeline().client().attempts().len(), 1);
}

#[tokio::test]
async fn junk_from_one_key_moves_on_to_the_next() {
    let client = FakeGenerationClient::new()
        .with_text("key-a", "Sorry, I can't help with that.")
        .with_failure("key-b", "HTTP 500: upstream error")
        .with_text("key-c", r#"[{"title":"Apple Crumble","co2_saved":"0.4 kg"}]"#);
    let engine = offline_engine(client);

    let recipes = engine.auto_suggest(&["apple"]).await.unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Apple Crumble");
    assert_eq!(recipes[0].co2_saved, "0.4 kg");
    assert_eq!(recipes[0].eco_benefit, "Eco-friendly choice");

    // key-c is somewhere in the shuffled order; nothing after it is tried.
    let tried = engine.pipeline().client().attempts();
    assert_eq!(tried.last().map(String::as_str), Some("key-c"));
}

#[tokio::test]
async fn unmatched_meal_gets_fallback_link_with_unchanged_name() {
    let client = FakeGenerationClient::new()
        .with_default_reply(FakeReply::Text(r#"["Apple Bread Pudding"]"#.to_string()));
    let engine = offline_engine(client);

    let meals = engine.meal_links(&["apple", "bread"]).await.unwrap();

    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].meal_name, "Apple Bread Pudding");
    assert_eq!(
        meals[0].recipe_link,
        "https://www.google.com/search?q=Apple+Bread+Pudding+recipe"
    );
}

#[tokio::test]
async fn meals_sharing_a_search_hit_never_share_a_link() {
    let page = r#"
        <a href="/recipe/6781/apple-bread-pudding/">Apple Bread Pudding 1,234 Ratings</a>
    "#;
    let http = MockClient::new()
        .with_html("https://www.allrecipes.com/search?q=Apple+Bread+Pudding", page)
        .with_html("https://www.allrecipes.com/search?q=Bread+Pudding", page)
        .with_status("https://www.allrecipes.com/search?q=Apple+Toast", 503);
    let search = AllRecipesSearch::new(http, Url::parse("https://www.allrecipes.com").unwrap());

    let client = FakeGenerationClient::new().with_default_reply(FakeReply::Text(
        r#"{"meals": ["Apple Bread Pudding", "Bread Pudding", "Apple Toast"]}"#.to_string(),
    ));
    let engine = RecipeEngine::new(
        pipeline(client),
        Enricher::new(search, Duration::from_secs(10), 4),
    );

    let meals = engine.meal_links(&["apple", "bread"]).await.unwrap();

    assert_eq!(meals.len(), 3);
    assert_eq!(meals[0].meal_name, "Apple Bread Pudding");
    assert_eq!(
        meals[0].recipe_link,
        "https://www.allrecipes.com/recipe/6781/apple-bread-pudding/"
    );
    assert_eq!(meals[1].meal_name, "Bread Pudding");
    assert_eq!(meals[1].recipe_link, fallback_search_url("Bread Pudding"));
    assert_eq!(meals[2].recipe_link, fallback_search_url("Apple Toast"));
}

#[tokio::test]
async fn tracking_parameters_do_not_let_two_meals_share_a_page() {
    let http = MockClient::new()
        .with_html(
            "https://www.allrecipes.com/search?q=Carrot+Soup",
            r#"<a href="/recipe/1/carrot-soup/?utm_source=search">Carrot Soup</a>"#,
        )
        .with_html(
            "https://www.allrecipes.com/search?q=Creamy+Carrot+Soup",
            r#"<a href="/recipe/1/carrot-soup/">Carrot Soup</a>"#,
        );
    let search = AllRecipesSearch::new(http, Url::parse("https://www.allrecipes.com").unwrap());

    let client = FakeGenerationClient::new().with_default_reply(FakeReply::Text(
        r#"["Carrot Soup", "Creamy Carrot Soup"]"#.to_string(),
    ));
    let engine = RecipeEngine::new(
        pipeline(client),
        Enricher::new(search, Duration::from_secs(10), 4),
    );

    let meals = engine.meal_links(&["carrot"]).await.unwrap();

    assert_eq!(
        meals[0].recipe_link,
        "https://www.allrecipes.com/recipe/1/carrot-soup/"
    );
    assert_eq!(meals[1].meal_name, "Creamy Carrot Soup");
    assert_eq!(
        meals[1].recipe_link,
        fallback_search_url("Creamy Carrot Soup")
    );
}

#[tokio::test]
async fn empty_ingredients_are_rejected_before_any_call() {
    let engine = offline_engine(FakeGenerationClient::new());

    let err = engine.meal_links(&[" ", "\t"]).await.unwrap_err();

    assert!(matches!(err, GenerationError::InvalidInput(_)));
    assert!(engine.pipeline().client().attempts().is_empty());
    assert!(engine.enricher().source().queries().is_empty());
}
