use crate::models::RecipeRecommendation;
use crate::normalization::normalize;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;

/// Preparation time assumed for recipes without one when sorting ascending.
const UNKNOWN_TIME_ASC: u32 = 9999;
/// Preparation time assumed for recipes without one when sorting descending.
const UNKNOWN_TIME_DESC: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// English and Spanish spellings, compared after normalization.
    pub fn parse(value: &str) -> Option<Self> {
        match normalize(value).as_str() {
            "easy" | "facil" => Some(Difficulty::Easy),
            "medium" | "medio" => Some(Difficulty::Medium),
            "hard" | "dificil" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Spanish display label for a raw difficulty value.
    pub fn label(value: Option<&str>) -> String {
        let raw = value.unwrap_or("");
        if normalize(raw).is_empty() {
            return "Sin dato".to_string();
        }
        match Difficulty::parse(raw) {
            Some(Difficulty::Easy) => "fácil".to_string(),
            Some(Difficulty::Medium) => "media".to_string(),
            Some(Difficulty::Hard) => "difícil".to_string(),
            None => raw.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DifficultyFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
}

impl DifficultyFilter {
    /// `All` accepts every recipe, including unknown or missing difficulty.
    pub fn matches(&self, difficulty: Option<&str>) -> bool {
        let wanted = match self {
            DifficultyFilter::All => return true,
            DifficultyFilter::Easy => Difficulty::Easy,
            DifficultyFilter::Medium => Difficulty::Medium,
            DifficultyFilter::Hard => Difficulty::Hard,
        };
        difficulty.and_then(Difficulty::parse) == Some(wanted)
    }
}

impl FromStr for DifficultyFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(DifficultyFilter::All),
            "EASY" => Ok(DifficultyFilter::Easy),
            "MEDIUM" => Ok(DifficultyFilter::Medium),
            "HARD" => Ok(DifficultyFilter::Hard),
            other => Err(anyhow::anyhow!("Unknown difficulty filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    None,
    TimeAsc,
    TimeDesc,
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SortMode::None),
            "timeAsc" | "time-asc" => Ok(SortMode::TimeAsc),
            "timeDesc" | "time-desc" => Ok(SortMode::TimeDesc),
            other => Err(anyhow::anyhow!("Unknown sort mode: {other}")),
        }
    }
}

/// Difficulty filtering and preparation-time ordering over an already
/// preference-filtered list.
pub struct RecipeSortFilter;

impl RecipeSortFilter {
    pub fn apply<'a, I>(
        recipes: I,
        difficulty: DifficultyFilter,
        sort: SortMode,
    ) -> Vec<&'a RecipeRecommendation>
    where
        I: IntoIterator<Item = &'a RecipeRecommendation>,
    {
        let mut list: Vec<&RecipeRecommendation> = recipes
            .into_iter()
            .filter(|r| difficulty.matches(r.difficulty.as_deref()))
            .collect();

        // sort_by_key is stable, so ties keep their input order
        match sort {
            SortMode::None => {}
            SortMode::TimeAsc => {
                list.sort_by_key(|r| r.preparation_time.unwrap_or(UNKNOWN_TIME_ASC));
            }
            SortMode::TimeDesc => {
                list.sort_by_key(|r| Reverse(r.preparation_time.unwrap_or(UNKNOWN_TIME_DESC)));
            }
        }

        list
    }
}
