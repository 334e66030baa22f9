use crate::diet::{DietRuleEngine, DietType};
use crate::models::{PantryItem, RecipeRecommendation, UserProfile};
use crate::normalization::{contains_either_way, normalize};

/// Decides recipe visibility from a user's diet and dislikes, and annotates
/// allergens.
///
/// Diet and dislikes exclude a recipe. Allergies only annotate it: a recipe
/// mentioning an allergen stays visible with a warning.
pub struct PreferenceFilter {
    diet_rules: DietRuleEngine,
}

impl PreferenceFilter {
    pub fn new(diet_rules: DietRuleEngine) -> Self {
        Self { diet_rules }
    }

    pub fn diet_rules(&self) -> &DietRuleEngine {
        &self.diet_rules
    }

    /// A missing profile behaves exactly like an empty one.
    pub fn is_visible(&self, recipe: &RecipeRecommendation, profile: Option<&UserProfile>) -> bool {
        let Some(profile) = profile else {
            return true;
        };

        let combined = recipe.combined_text();
        let diet = profile.diet_type;

        if self.diet_rules.violates_diet(&combined, diet) {
            log::debug!(
                "Recipe {} excluded by {} diet: {:?}",
                recipe.id,
                diet.unwrap_or(DietType::None),
                self.diet_rules.violations(&combined, diet)
            );
            return false;
        }

        if let Some(term) = disliked_match(recipe, &profile.disliked_ingredients) {
            log::debug!("Recipe {} excluded by disliked ingredient {:?}", recipe.id, term);
            return false;
        }

        true
    }

    pub fn matches_any_dislike(&self, recipe: &RecipeRecommendation, dislikes: &[String]) -> bool {
        disliked_match(recipe, dislikes).is_some()
    }

    /// Allergies the recipe's ingredients mention, in profile order.
    pub fn allergens_present(
        &self,
        recipe: &RecipeRecommendation,
        profile: Option<&UserProfile>,
    ) -> Vec<String> {
        let Some(profile) = profile else {
            return Vec::new();
        };
        if profile.allergies.is_empty() || !recipe.has_ingredients() {
            return Vec::new();
        }

        let joined = normalize(&recipe.ingredients_text());
        let lines: Vec<String> = recipe.ingredient_lines().map(normalize).collect();

        profile
            .allergies
            .iter()
            .filter(|allergy| mentions(&normalize(allergy), &joined, &lines))
            .cloned()
            .collect()
    }

    /// Allergies matching a pantry item's display name, for the pantry badge.
    pub fn allergens_for_item(&self, item: &PantryItem, profile: Option<&UserProfile>) -> Vec<String> {
        let Some(profile) = profile else {
            return Vec::new();
        };
        let name = normalize(item.display_name());

        profile
            .allergies
            .iter()
            .filter(|allergy| contains_either_way(&name, &normalize(allergy)))
            .cloned()
            .collect()
    }
}

/// `term` appears in `joined`, or one of the individual `lines` appears in `term`.
fn mentions(term: &str, joined: &str, lines: &[String]) -> bool {
    if term.is_empty() {
        return false;
    }
    joined.contains(term) || lines.iter().any(|line| contains_either_way(line, term))
}

fn disliked_match<'a>(recipe: &RecipeRecommendation, dislikes: &'a [String]) -> Option<&'a str> {
    if dislikes.is_empty() {
        return None;
    }

    let combined = normalize(&recipe.combined_text());
    let mut lines: Vec<String> = recipe.ingredient_lines().map(normalize).collect();
    lines.push(normalize(&recipe.title));

    dislikes
        .iter()
        .find(|d| mentions(&normalize(d), &combined, &lines))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PreferenceFilter {
        PreferenceFilter::new(DietRuleEngine::new().unwrap())
    }

    fn recipe(title: &str, ingredients: &[&str]) -> RecipeRecommendation {
        RecipeRecommendation {
            id: title.to_lowercase(),
            title: title.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn profile() -> UserProfile {
        UserProfile::empty(1)
    }

    #[test]
    fn test_no_profile_shows_everything() {
        let filter = filter();
        let r = recipe("Pollo asado", &["pollo", "sal"]);
        assert!(filter.is_visible(&r, None));
        assert!(filter.is_visible(&r, Some(&profile())));
        assert!(filter.allergens_present(&r, None).is_empty());
        assert!(filter.allergens_present(&r, Some(&profile())).is_empty());
    }

    #[test]
    fn test_diet_excludes() {
        let filter = filter();
        let mut p = profile();
        p.diet_type = Some(DietType::Vegan);

        assert!(!filter.is_visible(&recipe("Pechuga de pollo con arroz", &[]), Some(&p)));
        assert!(filter.is_visible(&recipe("Ensalada de tomate y lechuga", &["tomate"]), Some(&p)));
    }

    #[test]
    fn test_diet_checks_description_too() {
        let filter = filter();
        let mut p = profile();
        p.diet_type = Some(DietType::Vegetarian);

        let mut r = recipe("Guiso de la abuela", &["patatas", "zanahoria"]);
        assert!(filter.is_visible(&r, Some(&p)));
        r.description = "Tradicionalmente lleva chorizo".to_string();
        assert!(!filter.is_visible(&r, Some(&p)));
    }

    #[test]
    fn test_dislike_substring_excludes() {
        let filter = filter();
        let mut p = profile();
        p.disliked_ingredients = vec!["pimiento".to_string()];

        let r = recipe("Pimientos rojos asados", &["pimientos rojos asados"]);
        assert!(!filter.is_visible(&r, Some(&p)));
        assert!(filter.is_visible(&recipe("Ensalada verde", &["lechuga"]), Some(&p)));
    }

    #[test]
    fn test_dislike_reverse_containment() {
        let filter = filter();
        let mut p = profile();
        p.disliked_ingredients = vec!["Cebolla morada".to_string()];

        // the ingredient line is wholly contained in the disliked term
        let r = recipe("Sopa", &["cebolla"]);
        assert!(filter.matches_any_dislike(&r, &p.disliked_ingredients));
        assert!(!filter.is_visible(&r, Some(&p)));
    }

    #[test]
    fn test_dislike_accent_insensitive() {
        let filter = filter();
        let r = recipe("Brócoli al vapor", &["brócoli"]);
        assert!(filter.matches_any_dislike(&r, &["BROCOLI".to_string()]));
        assert!(!filter.matches_any_dislike(&r, &["  ".to_string()]));
        assert!(!filter.matches_any_dislike(&r, &[]));
    }

    #[test]
    fn test_allergens_warn_but_do_not_exclude() {
        let filter = filter();
        let mut p = profile();
        p.allergies = vec!["Nueces".to_string(), "Gluten".to_string(), "Cacahuete".to_string()];

        let r = recipe("Ensalada Waldorf", &["manzana", "nueces", "apio"]);
        assert_eq!(filter.allergens_present(&r, Some(&p)), vec!["Nueces".to_string()]);
        assert!(filter.is_visible(&r, Some(&p)));
    }

    #[test]
    fn test_allergens_only_look_at_ingredients() {
        let filter = filter();
        let mut p = profile();
        p.allergies = vec!["nueces".to_string()];

        let mut r = recipe("Tarta de nueces", &[]);
        assert!(filter.allergens_present(&r, Some(&p)).is_empty());

        r.ingredient_names = vec!["Nuez".to_string()];
        // "nuez" is contained in neither direction by "nueces"
        assert!(filter.allergens_present(&r, Some(&p)).is_empty());

        r.ingredient_names = vec!["nueces de macadamia".to_string()];
        assert_eq!(filter.allergens_present(&r, Some(&p)), vec!["nueces".to_string()]);
    }

    #[test]
    fn test_allergen_reverse_containment() {
        let filter = filter();
        let mut p = profile();
        p.allergies = vec!["Leche de vaca".to_string()];

        let r = recipe("Natillas", &["leche", "azúcar"]);
        assert_eq!(filter.allergens_present(&r, Some(&p)), vec!["Leche de vaca".to_string()]);
    }

    #[test]
    fn test_allergens_for_pantry_item() {
        let filter = filter();
        let mut p = profile();
        p.allergies = vec!["Cacahuete".to_string(), "huevo".to_string()];

        let item = PantryItem {
            id: 1,
            ingredient_id: 9,
            ingredient_name: Some("Peanut".into()),
            ingredient_name_es: Some("Crema de cacahuete".into()),
            quantity: 1.0,
            unit: None,
            ingredient_image_url: None,
        };
        assert_eq!(filter.allergens_for_item(&item, Some(&p)), vec!["Cacahuete".to_string()]);
        assert!(filter.allergens_for_item(&item, None).is_empty());
    }
}
