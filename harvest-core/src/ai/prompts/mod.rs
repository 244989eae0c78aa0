//! Prompt templates.
//!
//! Every prompt states the task, spells out the JSON it expects key by key,
//! and forbids code fences. Rendering is a pure function of its inputs.

pub mod schema;

pub use schema::{FieldKind, FieldSpec, OutputShape, SchemaDescriptor};

use schema::Task;

use crate::error::GenerationError;

const FORMAT_RULES: &str = "Respond with raw JSON only. Do not wrap the JSON in markdown code fences such as ```json, and do not write any text before or after it.";

/// Render the prompt for `terms` asking for output shaped like `schema`.
///
/// Terms are trimmed and blank terms ignored; nothing left is `InvalidInput`.
pub fn build_prompt<S: AsRef<str>>(
    terms: &[S],
    schema: &SchemaDescriptor,
) -> Result<String, GenerationError> {
    let terms: Vec<&str> = terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        return Err(GenerationError::InvalidInput(format!(
            "Cannot build {} prompt without ingredients",
            schema.name
        )));
    }

    let joined = terms.join(", ");
    let task = render_task(schema, &joined);
    let shape = render_shape(&schema.shape);

    Ok(format!("{task}\n\n{shape}\n\n{FORMAT_RULES}"))
}

fn render_task(schema: &SchemaDescriptor, joined: &str) -> String {
    let count = match schema.shape {
        OutputShape::Object(_) => 1,
        OutputShape::ObjectList { count, .. } | OutputShape::StringList { count } => count,
    };

    match schema.task {
        Task::Recipe => format!(
            "You are an eco-conscious chef. Create a recipe using these ingredients: {joined}."
        ),
        Task::EcoRecipes => format!(
            "You are an eco-conscious chef. Create {count} distinct eco-friendly recipes using these ingredients: {joined}."
        ),
        Task::MealNames => format!(
            "You are an eco-conscious chef. Suggest {count} distinct, well-known dishes that can be cooked with these ingredients: {joined}. Use dish names a recipe website would list."
        ),
        Task::Suggestions => format!(
            "Give me {count} creative, short recipe titles that feature '{joined}' as the star ingredient."
        ),
    }
}

fn render_shape(shape: &OutputShape) -> String {
    match shape {
        OutputShape::Object(fields) => {
            format!(
                "Return a STRICT JSON object with exactly these keys:\n{}",
                render_fields(fields)
            )
        }
        OutputShape::ObjectList { count, fields } => format!(
            "Return ONLY a JSON array of exactly {count} objects. Each object must have exactly these keys:\n{}",
            render_fields(fields)
        ),
        OutputShape::StringList { count } => format!(
            "Return ONLY a JSON array of exactly {count} strings, each one a dish title. Example: [\"First title\", \"Second title\"]"
        ),
    }
}

fn render_fields(fields: &[FieldSpec]) -> String {
    fields
        .iter()
        .map(|f| format!("- {} ({}): {}", f.name, f.kind.json_type(), f.description))
        .collect::<Vec<_>>()
        .join("\n")
}
