//! Turn free-form model output into fully populated records.
//!
//! Coercion happens in two phases: strip formatting and parse JSON, then
//! fill each declared field from the JSON or from its default. Only text
//! that contains no JSON at all is an error (`MalformedResponse`); missing
//! keys, nulls and wrongly typed values are healed with defaults.

use serde_json::{Map, Value};

use crate::error::GenerationError;
use crate::types::{EcoRecipe, GeneratedRecipe, GenerationRequest};

pub const DEFAULT_TITLE: &str = "Unknown Recipe";
pub const DEFAULT_INSTRUCTIONS: &str = "No instructions provided.";
pub const DEFAULT_COOKING_TIME_MINUTES: u32 = 30;
pub const DEFAULT_ECO_TIP: &str =
    "Cooking with what you already have keeps food out of the bin.";
pub const DEFAULT_CO2_SAVED: &str = "Unknown savings";
pub const DEFAULT_ECO_BENEFIT: &str = "Eco-friendly choice";

/// Records that can be built field by field from a JSON object.
pub trait Coerce: Sized {
    fn from_fields(fields: &Fields<'_>) -> Self;
}

/// Read access to one JSON object with per-field defaults.
///
/// A missing object (the element was not an object at all) behaves like an
/// object with no keys.
pub struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
    request: &'a GenerationRequest,
}

impl<'a> Fields<'a> {
    pub fn new(map: Option<&'a Map<String, Value>>, request: &'a GenerationRequest) -> Self {
        Self { map, request }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(name))
    }

    /// Non-blank string value, trimmed, or `default`.
    pub fn text(&self, name: &str, default: &str) -> String {
        match self.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => default.to_string(),
        }
    }

    /// Non-negative integer from a number or a string starting with digits.
    pub fn integer(&self, name: &str, default: u32) -> u32 {
        let parsed = match self.get(name) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                .and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(s)) => {
                let digits: String = s
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
            _ => None,
        };
        parsed.unwrap_or(default)
    }

    /// `ingredients_used`, defaulting to the caller's own terms.
    pub fn ingredients_used(&self) -> String {
        self.text("ingredients_used", &self.request.joined())
    }
}

impl Coerce for GeneratedRecipe {
    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            title: fields.text("title", DEFAULT_TITLE),
            cooking_time_minutes: fields
                .integer("cooking_time_minutes", DEFAULT_COOKING_TIME_MINUTES),
            instructions: fields.text("instructions", DEFAULT_INSTRUCTIONS),
            ingredients_used: fields.ingredients_used(),
            eco_tip: fields.text("eco_tip", DEFAULT_ECO_TIP),
        }
    }
}

impl Coerce for EcoRecipe {
    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            title: fields.text("title", DEFAULT_TITLE),
            instructions: fields.text("instructions", DEFAULT_INSTRUCTIONS),
            ingredients_used: fields.ingredients_used(),
            co2_saved: fields.text("co2_saved", DEFAULT_CO2_SAVED),
            eco_benefit: fields.text("eco_benefit", DEFAULT_ECO_BENEFIT),
        }
    }
}

/// Trim and remove every ```` ```json ```` and ```` ``` ```` marker.
pub fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Strip fences and parse. Falls back to the outermost `{..}`/`[..]` span
/// when the model wrapped the JSON in prose.
pub fn parse_json(raw: &str) -> Result<Value, GenerationError> {
    let cleaned = strip_fences(raw);

    let first_error = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(span) = outer_json_span(&cleaned) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(GenerationError::MalformedResponse(format!(
        "response is not JSON: {}",
        first_error
    )))
}

fn outer_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    if end <= start {
        return None;
    }
    text.get(start..=end)
}

/// Coerce a single record.
///
/// An array is accepted if it contains an object; its first object is used.
pub fn coerce_object<T: Coerce>(
    raw: &str,
    request: &GenerationRequest,
) -> Result<T, GenerationError> {
    let value = parse_json(raw)?;

    let map = match &value {
        Value::Object(map) => map,
        Value::Array(items) => items.iter().find_map(Value::as_object).ok_or_else(|| {
            GenerationError::MalformedResponse("array contains no JSON object".to_string())
        })?,
        other => {
            return Err(GenerationError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(other)
            )))
        }
    };

    Ok(T::from_fields(&Fields::new(Some(map), request)))
}

/// Coerce a batch of records, defaulting field by field inside each element.
pub fn coerce_list<T: Coerce>(
    raw: &str,
    request: &GenerationRequest,
) -> Result<Vec<T>, GenerationError> {
    let value = parse_json(raw)?;
    let items = list_items(value)?;

    if items.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "response array is empty".to_string(),
        ));
    }

    Ok(items
        .iter()
        .map(|item| T::from_fields(&Fields::new(item.as_object(), request)))
        .collect())
}

/// Coerce a list of titles.
///
/// Blank and non-string entries are dropped; objects contribute their
/// `title` or `name` key.
pub fn coerce_string_list(raw: &str) -> Result<Vec<String>, GenerationError> {
    let value = parse_json(raw)?;

    let strings: Vec<String> = match value {
        Value::Object(_) | Value::Array(_) => list_items(value)?
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.as_str()),
                Value::Object(map) => map
                    .get("title")
                    .or_else(|| map.get("name"))
                    .and_then(Value::as_str),
                _ => None,
            })
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        other => {
            return Err(GenerationError::MalformedResponse(format!(
                "expected a JSON array of strings, got {}",
                json_kind(&other)
            )))
        }
    };

    if strings.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "response contains no titles".to_string(),
        ));
    }

    Ok(strings)
}

/// Unwrap `[..]`, `{"recipes": [..]}` or a lone object into list items.
fn list_items(value: Value) -> Result<Vec<Value>, GenerationError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let wrapped = {
                let mut arrays = map.values().filter_map(Value::as_array);
                match (arrays.next(), arrays.next()) {
                    (Some(items), None) => Some(items.clone()),
                    _ => None,
                }
            };
            Ok(wrapped.unwrap_or_else(|| vec![Value::Object(map)]))
        }
        other => Err(GenerationError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts::SchemaDescriptor;

    fn request() -> GenerationRequest {
        GenerationRequest::new(["apple", "bread"]).unwrap()
    }

    #[test]
    fn fences_are_removed_anywhere_in_the_text() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(
            strip_fences("  Here you go ```json {\"a\":1} ``` enjoy "),
            "Here you go  {\"a\":1}  enjoy"
        );
        assert_eq!(strip_fences("[1]```"), "[1]");
    }

    #[test]
    fn fenced_and_unfenced_json_parse_the_same() {
        let bare = r#"{"title":"Toast","cooking_time_minutes":5}"#;
        for raw in [
            bare.to_string(),
            format!("```json\n{}\n```", bare),
            format!("```\n{}\n```", bare),
            format!("\n\n  {}  \n", bare),
        ] {
            let value = parse_json(&raw).unwrap();
            assert_eq!(value["title"], "Toast");
        }
    }

    #[test]
    fn json_inside_prose_is_recovered() {
        let value = parse_json("Sure! Here is your recipe: {\"title\": \"Soup\"} Enjoy.").unwrap();
        assert_eq!(value["title"], "Soup");

        let value = parse_json("Titles: [\"A\", \"B\"] hope that helps").unwrap();
        assert_eq!(value[1], "B");
    }

    #[test]
    fn text_without_json_is_malformed() {
        for raw in ["", "```json\n```", "I cannot help with that.", "{ title: Toast"] {
            assert!(
                matches!(parse_json(raw), Err(GenerationError::MalformedResponse(_))),
                "expected malformed for {:?}",
                raw
            );
        }
    }

    #[test]
    fn missing_fields_get_defaults() {
        let recipe: GeneratedRecipe =
            coerce_object("```json\n{\"title\":\"Toast\"}\n```", &request()).unwrap();

        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.instructions, "No instructions provided.");
        assert_eq!(recipe.ingredients_used, "apple, bread");
        assert_eq!(recipe.cooking_time_minutes, DEFAULT_COOKING_TIME_MINUTES);
        assert_eq!(recipe.eco_tip, DEFAULT_ECO_TIP);
    }

    #[test]
    fn wrongly_typed_null_and_blank_fields_get_defaults() {
        let raw = r#"{
            "title": 42,
            "instructions": null,
            "ingredients_used": "   ",
            "cooking_time_minutes": "soon",
            "eco_tip": ["not", "a", "string"]
        }"#;
        let recipe: GeneratedRecipe = coerce_object(raw, &request()).unwrap();

        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.instructions, DEFAULT_INSTRUCTIONS);
        assert_eq!(recipe.ingredients_used, "apple, bread");
        assert_eq!(recipe.cooking_time_minutes, DEFAULT_COOKING_TIME_MINUTES);
        assert_eq!(recipe.eco_tip, DEFAULT_ECO_TIP);
    }

    #[test]
    fn cooking_time_accepts_numbers_and_numeric_strings() {
        let cases = [
            (r#"{"cooking_time_minutes": 25}"#, 25),
            (r#"{"cooking_time_minutes": 12.6}"#, 13),
            (r#"{"cooking_time_minutes": "45 minutes"}"#, 45),
            (r#"{"cooking_time_minutes": -5}"#, DEFAULT_COOKING_TIME_MINUTES),
            (r#"{"cooking_time_minutes": 1e12}"#, DEFAULT_COOKING_TIME_MINUTES),
        ];
        for (raw, expected) in cases {
            let recipe: GeneratedRecipe = coerce_object(raw, &request()).unwrap();
            assert_eq!(recipe.cooking_time_minutes, expected, "input {}", raw);
        }
    }

    #[test]
    fn single_object_mode_takes_first_object_of_an_array() {
        let recipe: GeneratedRecipe =
            coerce_object(r#"["noise", {"title": "Crumble"}]"#, &request()).unwrap();
        assert_eq!(recipe.title, "Crumble");

        assert!(matches!(
            coerce_object::<GeneratedRecipe>("[1, 2]", &request()),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            coerce_object::<GeneratedRecipe>("\"just a string\"", &request()),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn list_elements_default_independently() {
        let raw = r#"```json
        [
            {"title": "Apple Crumble", "co2_saved": "approx. 1.2kg CO2e"},
            "garbage element",
            {"instructions": "Toast the bread.", "eco_benefit": "Uses stale bread."}
        ]
        ```"#;
        let recipes: Vec<EcoRecipe> = coerce_list(raw, &request()).unwrap();

        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].title, "Apple Crumble");
        assert_eq!(recipes[0].co2_saved, "approx. 1.2kg CO2e");
        assert_eq!(recipes[0].instructions, DEFAULT_INSTRUCTIONS);

        assert_eq!(recipes[1].title, DEFAULT_TITLE);
        assert_eq!(recipes[1].ingredients_used, "apple, bread");
        assert_eq!(recipes[1].eco_benefit, DEFAULT_ECO_BENEFIT);

        assert_eq!(recipes[2].title, DEFAULT_TITLE);
        assert_eq!(recipes[2].instructions, "Toast the bread.");
        assert_eq!(recipes[2].co2_saved, DEFAULT_CO2_SAVED);
    }

    #[test]
    fn wrapped_and_lone_objects_become_lists() {
        let wrapped: Vec<EcoRecipe> =
            coerce_list(r#"{"recipes": [{"title": "A"}, {"title": "B"}]}"#, &request()).unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].title, "B");

        let lone: Vec<EcoRecipe> = coerce_list(r#"{"title": "Solo"}"#, &request()).unwrap();
        assert_eq!(lone.len(), 1);
        assert_eq!(lone[0].title, "Solo");
    }

    #[test]
    fn empty_list_is_malformed() {
        assert!(matches!(
            coerce_list::<EcoRecipe>("[]", &request()),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn string_lists_keep_titles_only() {
        let titles =
            coerce_string_list(r#"["Apple Pie", "", 7, {"title": "Bread Pudding"}, "  Toast  "]"#)
                .unwrap();
        assert_eq!(titles, vec!["Apple Pie", "Bread Pudding", "Toast"]);

        let wrapped = coerce_string_list(r#"{"suggestions": ["Kale Chips"]}"#).unwrap();
        assert_eq!(wrapped, vec!["Kale Chips"]);

        assert!(matches!(
            coerce_string_list("[1, 2, null]"),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            coerce_string_list("true"),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn record_fields_match_the_declared_schema() {
        fn keys<T: serde::Serialize>(record: &T) -> Vec<String> {
            let mut keys: Vec<String> = serde_json::to_value(record)
                .unwrap()
                .as_object()
                .unwrap()
                .keys()
                .cloned()
                .collect();
            keys.sort();
            keys
        }
        fn declared(schema: SchemaDescriptor) -> Vec<String> {
            let mut names: Vec<String> =
                schema.fields().iter().map(|f| f.name.to_string()).collect();
            names.sort();
            names
        }

        let recipe: GeneratedRecipe = coerce_object("{}", &request()).unwrap();
        assert_eq!(keys(&recipe), declared(SchemaDescriptor::recipe()));

        let eco: Vec<EcoRecipe> = coerce_list("[{}]", &request()).unwrap();
        assert_eq!(keys(&eco[0]), declared(SchemaDescriptor::eco_recipes(3)));
    }
}
