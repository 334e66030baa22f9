//! Records exchanged with the data layer.
//!
//! Field names follow the JSON the backend emits (camelCase). Missing
//! collections deserialize as empty so a sparse payload is never an error.

use crate::diet::DietType;
use crate::normalization::normalize;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: u64,
    pub ingredient_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_name_es: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_image_url: Option<String>,
}

impl PantryItem {
    /// Localized name first, then the base name.
    pub fn display_name(&self) -> &str {
        self.ingredient_name_es
            .as_deref()
            .or(self.ingredient_name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: u64,
    pub name: String,
    #[serde(default, alias = "nameEs")]
    pub localized_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Ingredient {
    pub fn display_name(&self) -> &str {
        self.localized_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CookingSkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CookingSkillLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize(value).as_str() {
            "beginner" | "principiante" => Some(CookingSkillLevel::Beginner),
            "intermediate" | "intermedio" => Some(CookingSkillLevel::Intermediate),
            "advanced" | "avanzado" => Some(CookingSkillLevel::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub allergies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub intolerances: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub disliked_ingredients: Vec<String>,
    #[serde(default)]
    pub diet_type: Option<DietType>,
    #[serde(default, deserialize_with = "lenient_skill_level")]
    pub cooking_skill_level: Option<CookingSkillLevel>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend stores the skill level as free text; anything unrecognised
/// reads as unset instead of failing the whole profile.
fn lenient_skill_level<'de, D>(deserializer: D) -> Result<Option<CookingSkillLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let level = CookingSkillLevel::parse(&raw);
    if level.is_none() && !raw.trim().is_empty() {
        log::debug!("Ignoring unknown cooking skill level {raw:?}");
    }
    Ok(level)
}

impl UserProfile {
    /// The profile used when the data layer has none for this user yet.
    pub fn empty(user_id: u64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecommendation {
    #[serde(alias = "openAiId")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "ingredientsText")]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub ingredient_names: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub preparation_time: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl RecipeRecommendation {
    /// Every ingredient string the recipe carries, in order.
    pub fn ingredient_lines(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .iter()
            .chain(self.ingredient_names.iter())
            .map(String::as_str)
    }

    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty() || !self.ingredient_names.is_empty()
    }

    pub fn ingredients_text(&self) -> String {
        self.ingredient_lines().collect::<Vec<_>>().join(" ")
    }

    /// Title, description and ingredients joined for rule matching.
    pub fn combined_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.ingredients_text()
        )
    }

    /// Description cut to `limit` characters, with a trailing ellipsis when cut.
    pub fn short_description(&self, limit: usize) -> String {
        if self.description.chars().count() <= limit {
            return self.description.clone();
        }
        let cut: String = self.description.chars().take(limit).collect();
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_from_backend_json() {
        let json = r#"{
            "openAiId": "r-1",
            "title": "Tortilla",
            "description": "Clásica",
            "ingredients": ["4 huevos", "2 patatas"],
            "instructions": ["Batir", "Freír"],
            "preparationTime": 25,
            "difficulty": "Fácil",
            "category": "cena"
        }"#;
        let recipe: RecipeRecommendation = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, "r-1");
        assert_eq!(recipe.preparation_time, Some(25));
        assert!(recipe.ingredient_names.is_empty());
        assert_eq!(recipe.ingredients_text(), "4 huevos 2 patatas");
        assert_eq!(recipe.combined_text(), "Tortilla Clásica 4 huevos 2 patatas");
    }

    #[test]
    fn test_recipe_null_fields() {
        let json = r#"{"id": "r-2", "title": "Misterio", "preparationTime": null, "difficulty": null}"#;
        let recipe: RecipeRecommendation = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.preparation_time, None);
        assert_eq!(recipe.difficulty, None);
        assert!(!recipe.has_ingredients());
    }

    #[test]
    fn test_ingredient_names_are_merged() {
        let recipe = RecipeRecommendation {
            ingredients: vec!["arroz".into()],
            ingredient_names: vec!["azafrán".into()],
            ..Default::default()
        };
        assert_eq!(recipe.ingredient_lines().collect::<Vec<_>>(), vec!["arroz", "azafrán"]);
        assert!(recipe.has_ingredients());
    }

    #[test]
    fn test_short_description() {
        let recipe = RecipeRecommendation {
            description: "Una receta muy rápida de preparar".into(),
            ..Default::default()
        };
        assert_eq!(recipe.short_description(100), "Una receta muy rápida de preparar");
        assert_eq!(recipe.short_description(11), "Una receta…");
        assert_eq!(recipe.short_description(18), "Una receta muy ráp…");
    }

    #[test]
    fn test_profile_sparse_json() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"userId": 7, "dietType": "VEGAN", "allergies": null, "intolerances": ["lactosa"]}"#,
        )
        .unwrap();
        assert_eq!(profile.user_id, 7);
        assert_eq!(profile.diet_type, Some(DietType::Vegan));
        assert!(profile.allergies.is_empty());
        assert!(profile.disliked_ingredients.is_empty());
        assert_eq!(profile.intolerances, vec!["lactosa".to_string()]);
        assert_eq!(profile.cooking_skill_level, None);
    }

    #[test]
    fn test_profile_skill_level_is_lenient() {
        let parse = |level: &str| -> UserProfile {
            serde_json::from_str(&format!(
                r#"{{"userId": 1, "dietType": "VEGAN", "allergies": ["nueces"], "cookingSkillLevel": {level}}}"#
            ))
            .unwrap()
        };

        assert_eq!(parse(r#""ADVANCED""#).cooking_skill_level, Some(CookingSkillLevel::Advanced));
        assert_eq!(parse(r#""beginner""#).cooking_skill_level, Some(CookingSkillLevel::Beginner));
        assert_eq!(
            parse(r#""Intermedio""#).cooking_skill_level,
            Some(CookingSkillLevel::Intermediate)
        );

        for unknown in [r#""EXPERT""#, r#""""#, "null"] {
            let profile = parse(unknown);
            assert_eq!(profile.cooking_skill_level, None);
            assert_eq!(profile.diet_type, Some(DietType::Vegan));
            assert_eq!(profile.allergies, vec!["nueces".to_string()]);
        }
    }

    #[test]
    fn test_skill_level_serializes_uppercase() {
        let mut profile = UserProfile::empty(2);
        profile.cooking_skill_level = Some(CookingSkillLevel::Intermediate);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["cookingSkillLevel"], "INTERMEDIATE");

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_display_names() {
        let item = PantryItem {
            id: 1,
            ingredient_id: 3,
            ingredient_name: Some("Tomato".into()),
            ingredient_name_es: Some("Tomate".into()),
            quantity: 2.0,
            unit: None,
            ingredient_image_url: None,
        };
        assert_eq!(item.display_name(), "Tomate");

        let bare = PantryItem {
            ingredient_name_es: None,
            ingredient_name: None,
            ..item
        };
        assert_eq!(bare.display_name(), "");

        let ingredient: Ingredient =
            serde_json::from_str(r#"{"id": 1, "name": "Garlic", "nameEs": "Ajo"}"#).unwrap();
        assert_eq!(ingredient.display_name(), "Ajo");
    }
}
