use crate::category::CategoryLabel;
use crate::diet::DietType;
use crate::normalization::{normalize, tokenize};
use crate::sorting::{DifficultyFilter, SortMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub categories: CategoryConfig,
    pub diets: DietConfig,
    pub recipes: RecipeViewConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Keywords appended to the built-in category tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub extra_keywords: HashMap<CategoryLabel, Vec<String>>,
}

/// Forbidden terms appended to the built-in diet rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietConfig {
    pub extra_terms: HashMap<DietType, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeViewConfig {
    pub difficulty: DifficultyFilter,
    pub sort: SortMode,
    pub description_limit: usize,
}

impl Default for RecipeViewConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyFilter::All,
            sort: SortMode::None,
            description_limit: 140,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Locale requested from the recognizer.
    pub recognizer_language: String,
    /// Language code sent along with the voice search.
    pub search_language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            recognizer_language: "es-ES".to_string(),
            search_language: "es".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: EngineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;
        Ok(config)
    }

    /// Falls back to the defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            log::warn!(
                "Configuration file '{}' not found, using default configuration",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Problems that would not stop the engine but are worth reporting.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.categories.extra_keywords.contains_key(&CategoryLabel::Other) {
            warnings.push("categories.extra_keywords.Other is ignored".to_string());
        }
        for (label, keywords) in &self.categories.extra_keywords {
            for keyword in keywords {
                if tokenize(&normalize(keyword)).len() > 1 {
                    warnings.push(format!(
                        "Keyword {keyword:?} for {label} has several tokens and can never match"
                    ));
                }
            }
        }
        for diet in self.diets.extra_terms.keys() {
            if matches!(diet, DietType::None | DietType::Other) {
                warnings.push(format!("diets.extra_terms.{diet} is ignored"));
            }
        }
        if self.recipes.description_limit == 0 {
            warnings.push("recipes.description_limit is 0, descriptions render empty".to_string());
        }
        if self.speech.search_language.trim().is_empty() {
            warnings.push("speech.search_language is empty".to_string());
        }

        warnings
    }
}
