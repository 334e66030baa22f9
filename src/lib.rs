pub mod category;
pub mod config;
pub mod diet;
pub mod engine;
pub mod models;
pub mod normalization;
pub mod pantry;
pub mod preference;
pub mod profile;
pub mod sorting;
pub mod speech;

pub use category::{CategoryClassifier, CategoryFilter, CategoryLabel};
pub use config::EngineConfig;
pub use diet::{DietRuleEngine, DietType};
pub use engine::{PantryEngine, RecipeCard};
pub use models::{PantryItem, RecipeRecommendation, UserProfile};
pub use pantry::Pantry;
pub use sorting::{DifficultyFilter, RecipeSortFilter, SortMode};
pub use speech::{SpeechSession, SpeechSignal, SpeechStreamReconciler, VoiceQuery, VoiceSearch};
