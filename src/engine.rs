use crate::category::{CategoryClassifier, CategoryFilter, CategoryLabel};
use crate::config::EngineConfig;
use crate::diet::DietRuleEngine;
use crate::models::{PantryItem, RecipeRecommendation, UserProfile};
use crate::pantry::Pantry;
use crate::preference::PreferenceFilter;
use crate::sorting::{Difficulty, DifficultyFilter, RecipeSortFilter, SortMode};
use crate::speech::{SpeechSession, SpeechSignal, SpeechStreamReconciler};
use serde::Serialize;
use tokio::sync::mpsc;

/// What the recipe list shows for one visible recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub difficulty: String,
    pub preparation_time: Option<u32>,
    pub allergens: Vec<String>,
}

/// Entry point composing classification, preference filtering, sorting and
/// speech reconciliation from one configuration.
pub struct PantryEngine {
    config: EngineConfig,
    classifier: CategoryClassifier,
    preferences: PreferenceFilter,
}

impl PantryEngine {
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        for warning in config.warnings() {
            log::warn!("Configuration: {warning}");
        }

        let classifier =
            CategoryClassifier::with_extra_keywords(&config.categories.extra_keywords);
        let diet_rules = DietRuleEngine::with_extra_terms(&config.diets.extra_terms)?;

        Ok(Self {
            config,
            classifier,
            preferences: PreferenceFilter::new(diet_rules),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    pub fn preferences(&self) -> &PreferenceFilter {
        &self.preferences
    }

    pub fn classify(&self, ingredient_name: &str) -> CategoryLabel {
        self.classifier.classify(ingredient_name)
    }

    pub fn pantry_categories(&self, pantry: &Pantry) -> Vec<CategoryFilter> {
        pantry.categories(&self.classifier)
    }

    pub fn pantry_allergens(
        &self,
        item: &PantryItem,
        profile: Option<&UserProfile>,
    ) -> Vec<String> {
        self.preferences.allergens_for_item(item, profile)
    }

    pub fn is_visible(&self, recipe: &RecipeRecommendation, profile: Option<&UserProfile>) -> bool {
        self.preferences.is_visible(recipe, profile)
    }

    pub fn allergens_present(
        &self,
        recipe: &RecipeRecommendation,
        profile: Option<&UserProfile>,
    ) -> Vec<String> {
        self.preferences.allergens_present(recipe, profile)
    }

    /// Diet, then dislikes, then difficulty, then a stable sort by time.
    pub fn visible_recipes<'a>(
        &self,
        recipes: &'a [RecipeRecommendation],
        profile: Option<&UserProfile>,
        difficulty: DifficultyFilter,
        sort: SortMode,
    ) -> Vec<&'a RecipeRecommendation> {
        let visible = recipes
            .iter()
            .filter(|recipe| self.preferences.is_visible(recipe, profile));
        let list = RecipeSortFilter::apply(visible, difficulty, sort);

        log::debug!(
            "{} of {} recipes visible (difficulty {:?}, sort {:?})",
            list.len(),
            recipes.len(),
            difficulty,
            sort
        );
        list
    }

    pub fn recipe_cards(
        &self,
        recipes: &[RecipeRecommendation],
        profile: Option<&UserProfile>,
        difficulty: DifficultyFilter,
        sort: SortMode,
    ) -> Vec<RecipeCard> {
        self.visible_recipes(recipes, profile, difficulty, sort)
            .into_iter()
            .map(|recipe| RecipeCard {
                id: recipe.id.clone(),
                title: recipe.title.clone(),
                summary: recipe.short_description(self.config.recipes.description_limit),
                difficulty: Difficulty::label(recipe.difficulty.as_deref()),
                preparation_time: recipe.preparation_time,
                allergens: self.preferences.allergens_present(recipe, profile),
            })
            .collect()
    }

    /// Locale a recognizer should be opened with for this engine's sessions.
    pub fn recognizer_language(&self) -> &str {
        &self.config.speech.recognizer_language
    }

    pub fn speech_reconciler(&self) -> SpeechStreamReconciler {
        SpeechStreamReconciler::new(&self.config.speech.search_language)
    }

    pub fn speech_session(&self) -> (mpsc::UnboundedSender<SpeechSignal>, SpeechSession) {
        SpeechSession::channel(&self.config.speech.search_language)
    }
}
