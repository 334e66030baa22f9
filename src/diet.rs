use crate::normalization::normalize;
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dietary restriction selected in the user profile.
///
/// Parsing is lenient: whatever the data layer sends is normalized and
/// matched by fragment, and anything unrecognised becomes `Other`, which
/// never excludes a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietType {
    None,
    Vegan,
    Vegetarian,
    GlutenFree,
    Keto,
    Other,
}

impl DietType {
    pub fn parse(value: &str) -> Self {
        let diet = normalize(value);
        if diet.is_empty() || diet == "none" {
            DietType::None
        } else if diet.contains("vegan") {
            DietType::Vegan
        } else if diet.contains("vegetar") {
            DietType::Vegetarian
        } else if diet.contains("gluten") {
            DietType::GlutenFree
        } else if diet.contains("keto") {
            DietType::Keto
        } else {
            DietType::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DietType::None => "NONE",
            DietType::Vegan => "VEGAN",
            DietType::Vegetarian => "VEGETARIAN",
            DietType::GlutenFree => "GLUTEN_FREE",
            DietType::Keto => "KETO",
            DietType::Other => "OTHER",
        }
    }

    /// Forbidden terms, already in normalized form.
    fn default_terms(&self) -> Vec<&'static str> {
        match self {
            DietType::Vegan => [MEAT_TERMS, SEAFOOD_TERMS, DAIRY_TERMS, EGG_TERMS].concat(),
            DietType::Vegetarian => [MEAT_TERMS, SEAFOOD_TERMS].concat(),
            DietType::GlutenFree => GLUTEN_TERMS.to_vec(),
            DietType::Keto => KETO_TERMS.to_vec(),
            DietType::None | DietType::Other => Vec::new(),
        }
    }

    const RESTRICTIVE: [DietType; 4] = [
        DietType::Vegan,
        DietType::Vegetarian,
        DietType::GlutenFree,
        DietType::Keto,
    ];
}

impl From<String> for DietType {
    fn from(value: String) -> Self {
        DietType::parse(&value)
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MEAT_TERMS: &[&str] = &[
    "carne", "pollo", "cerdo", "ternera", "jamon", "pavo", "chorizo", "lomo", "panceta",
];
const SEAFOOD_TERMS: &[&str] = &[
    "pescado", "atun", "salmon", "merluza", "marisco", "gamba", "pulpo", "calamar",
];
const DAIRY_TERMS: &[&str] = &["leche", "queso", "yogur", "yogurt", "nata", "mantequilla"];
const EGG_TERMS: &[&str] = &["huevo", "huevos"];
const GLUTEN_TERMS: &[&str] = &[
    "pan", "harina", "trigo", "cuscus", "cus-cus", "pasta", "espagueti", "espaguetti", "fideo",
];
const KETO_TERMS: &[&str] = &[
    "azucar", "pasta", "espagueti", "espaguetti", "pan", "arroz", "dulce", "pastel", "tarta",
];

struct DietRule {
    terms: Vec<String>,
    pattern: Regex,
}

/// Substring-based forbidden-term rules per diet.
///
/// Matching is deliberately conservative: a forbidden term anywhere in the
/// text excludes, even inside a longer word or a negation such as
/// "sin pan".
pub struct DietRuleEngine {
    rules: HashMap<DietType, DietRule>,
}

impl DietRuleEngine {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_extra_terms(&HashMap::new())
    }

    pub fn with_extra_terms(extra: &HashMap<DietType, Vec<String>>) -> anyhow::Result<Self> {
        let mut rules = HashMap::new();

        for diet in DietType::RESTRICTIVE {
            let mut terms: Vec<String> = diet.default_terms().iter().map(|t| t.to_string()).collect();
            if let Some(configured) = extra.get(&diet) {
                for term in configured.iter().map(|t| normalize(t)) {
                    if !term.is_empty() && !terms.contains(&term) {
                        terms.push(term);
                    }
                }
            }

            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = Regex::new(&format!("({alternation})"))
                .with_context(|| format!("Failed to compile forbidden terms for {diet}"))?;

            rules.insert(diet, DietRule { terms, pattern });
        }

        for diet in extra.keys() {
            if !DietType::RESTRICTIVE.contains(diet) {
                log::warn!("Forbidden terms configured for {diet} are ignored");
            }
        }

        Ok(Self { rules })
    }

    /// Whether `text` mentions any term the diet forbids.
    ///
    /// `text` is normalized here, so callers can pass raw recipe text.
    pub fn violates_diet(&self, text: &str, diet: Option<DietType>) -> bool {
        let Some(rule) = diet.and_then(|d| self.rules.get(&d)) else {
            return false;
        };
        rule.pattern.is_match(&normalize(text))
    }

    /// Forbidden terms found in `text`, in order of first appearance.
    pub fn violations(&self, text: &str, diet: Option<DietType>) -> Vec<String> {
        let Some(rule) = diet.and_then(|d| self.rules.get(&d)) else {
            return Vec::new();
        };

        let mut found: Vec<String> = Vec::new();
        for m in rule.pattern.find_iter(&normalize(text)) {
            let term = m.as_str().to_string();
            if !found.contains(&term) {
                found.push(term);
            }
        }
        found
    }

    pub fn forbidden_terms(&self, diet: DietType) -> &[String] {
        self.rules
            .get(&diet)
            .map(|rule| rule.terms.as_slice())
            .unwrap_or(&[])
    }
}
