//! Output shapes the prompts ask for and the coercer enforces.

/// JSON type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    pub fn json_type(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
        }
    }
}

/// One key the model must return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

impl FieldSpec {
    const fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            description,
        }
    }

    const fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            description,
        }
    }
}

pub const RECIPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "the name of the dish"),
    FieldSpec::integer("cooking_time_minutes", "total cooking time in minutes"),
    FieldSpec::text(
        "instructions",
        "step by step instructions, may include newline characters",
    ),
    FieldSpec::text(
        "ingredients_used",
        "comma separated list of the ingredients the recipe uses",
    ),
    FieldSpec::text("eco_tip", "a quick tip about why this meal is sustainable"),
];

pub const ECO_RECIPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "the name of the dish"),
    FieldSpec::text(
        "instructions",
        "very thorough step-by-step cooking instructions, including measurements and temperatures",
    ),
    FieldSpec::text(
        "ingredients_used",
        "comma separated list of the ingredients the recipe uses",
    ),
    FieldSpec::text(
        "co2_saved",
        "estimated CO2 emissions saved compared to a typical meat-based equivalent meal, e.g. 'approx. 1.5kg CO2e'",
    ),
    FieldSpec::text(
        "eco_benefit",
        "one short, punchy sentence explaining why this is good for the environment",
    ),
];

/// Top-level JSON structure expected from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Object(&'static [FieldSpec]),
    ObjectList {
        count: usize,
        fields: &'static [FieldSpec],
    },
    StringList {
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    Recipe,
    EcoRecipes,
    MealNames,
    Suggestions,
}

/// What a prompt asks for: the task framing plus the output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    /// Short name used in logs.
    pub name: &'static str,
    pub(crate) task: Task,
    pub shape: OutputShape,
}

impl SchemaDescriptor {
    /// One full recipe object.
    pub const fn recipe() -> Self {
        Self {
            name: "recipe",
            task: Task::Recipe,
            shape: OutputShape::Object(RECIPE_FIELDS),
        }
    }

    /// `count` distinct eco-friendly recipes.
    pub const fn eco_recipes(count: usize) -> Self {
        Self {
            name: "eco_recipes",
            task: Task::EcoRecipes,
            shape: OutputShape::ObjectList {
                count,
                fields: ECO_RECIPE_FIELDS,
            },
        }
    }

    /// `count` dish names a recipe site would list.
    pub const fn meal_names(count: usize) -> Self {
        Self {
            name: "meal_names",
            task: Task::MealNames,
            shape: OutputShape::StringList { count },
        }
    }

    /// `count` creative titles starring a single ingredient.
    pub const fn suggestions(count: usize) -> Self {
        Self {
            name: "suggestions",
            task: Task::Suggestions,
            shape: OutputShape::StringList { count },
        }
    }

    /// Declared fields, empty for string lists.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.shape {
            OutputShape::Object(fields) => fields,
            OutputShape::ObjectList { fields, .. } => fields,
            OutputShape::StringList { .. } => &[],
        }
    }
}
