use crate::normalization::{normalize, NormalizedText};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryLabel {
    Vegetables,
    Fruits,
    Dairy,
    Grains,
    Oils,
    Spices,
    Meats,
    Seafood,
    Other,
}

impl CategoryLabel {
    /// Classification precedence. The first table with a token hit wins.
    pub const PRECEDENCE: [CategoryLabel; 8] = [
        CategoryLabel::Vegetables,
        CategoryLabel::Fruits,
        CategoryLabel::Dairy,
        CategoryLabel::Grains,
        CategoryLabel::Oils,
        CategoryLabel::Spices,
        CategoryLabel::Meats,
        CategoryLabel::Seafood,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Vegetables => "Vegetables",
            CategoryLabel::Fruits => "Fruits",
            CategoryLabel::Dairy => "Dairy",
            CategoryLabel::Grains => "Grains",
            CategoryLabel::Oils => "Oils",
            CategoryLabel::Spices => "Spices",
            CategoryLabel::Meats => "Meats",
            CategoryLabel::Seafood => "Seafood",
            CategoryLabel::Other => "Other",
        }
    }

    fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            CategoryLabel::Vegetables => VEGETABLE_KEYWORDS,
            CategoryLabel::Fruits => FRUIT_KEYWORDS,
            CategoryLabel::Dairy => DAIRY_KEYWORDS,
            CategoryLabel::Grains => GRAIN_KEYWORDS,
            CategoryLabel::Oils => OIL_KEYWORDS,
            CategoryLabel::Spices => SPICE_KEYWORDS,
            CategoryLabel::Meats => MEAT_KEYWORDS,
            CategoryLabel::Seafood => SEAFOOD_KEYWORDS,
            CategoryLabel::Other => &[],
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VEGETABLE_KEYWORDS: &[&str] = &[
    "tomate", "tomates", "cebolla", "cebollas", "ajo", "ajos", "papa", "papas", "patata",
    "patatas", "zanahoria", "zanahorias", "pimiento", "pimientos", "lechuga", "espinaca",
    "espinacas", "calabacin", "calabaza", "berenjena", "brocoli", "coliflor", "pepino", "apio",
    "puerro", "champinon", "champinones", "setas", "judias", "guisantes", "alcachofa", "col",
    "repollo", "remolacha", "tomato", "onion", "garlic", "potato", "carrot", "lettuce",
    "spinach", "broccoli", "cucumber", "mushroom", "mushrooms",
];

const FRUIT_KEYWORDS: &[&str] = &[
    "manzana", "manzanas", "platano", "platanos", "banana", "naranja", "naranjas", "limon",
    "limones", "lima", "fresa", "fresas", "uva", "uvas", "pera", "peras", "melocoton", "pina",
    "mango", "kiwi", "sandia", "melon", "cereza", "cerezas", "aguacate", "frambuesa", "arandano",
    "arandanos", "apple", "lemon", "orange", "strawberry", "grape", "avocado",
];

const DAIRY_KEYWORDS: &[&str] = &[
    "leche", "queso", "quesos", "yogur", "yogurt", "nata", "mantequilla", "huevo", "huevos",
    "requeson", "milk", "cheese", "butter", "cream", "egg", "eggs",
];

const GRAIN_KEYWORDS: &[&str] = &[
    "arroz", "pasta", "pan", "harina", "trigo", "avena", "cuscus", "quinoa", "espagueti",
    "espaguetis", "fideo", "fideos", "macarrones", "cebada", "centeno", "maiz", "rice", "bread",
    "flour", "oats", "wheat",
];

const OIL_KEYWORDS: &[&str] = &["aceite", "aceites", "margarina", "manteca", "oil"];

const SPICE_KEYWORDS: &[&str] = &[
    "sal", "pimienta", "oregano", "comino", "canela", "pimenton", "curry", "azafran", "perejil",
    "albahaca", "tomillo", "romero", "laurel", "cilantro", "clavo", "jengibre",
    "salt", "cinnamon", "cumin", "paprika", "basil", "thyme",
];

const MEAT_KEYWORDS: &[&str] = &[
    "pollo", "carne", "cerdo", "ternera", "jamon", "pavo", "chorizo", "lomo", "panceta", "res",
    "cordero", "salchicha", "salchichas", "bacon", "tocino", "pechuga", "chicken", "beef", "pork",
    "ham", "turkey", "lamb",
];

const SEAFOOD_KEYWORDS: &[&str] = &[
    "pescado", "atun", "salmon", "merluza", "marisco", "mariscos", "gamba", "gambas", "pulpo",
    "calamar", "calamares", "camaron", "camarones", "langostino", "langostinos", "bacalao",
    "sardina", "sardinas", "mejillon", "mejillones", "fish", "tuna", "shrimp",
];

/// Assigns each ingredient name exactly one grocery category by token membership.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    tables: Vec<(CategoryLabel, HashSet<String>)>,
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self::with_extra_keywords(&HashMap::new())
    }

    /// Builds the default tables and appends configured keywords per label.
    /// Extra keywords are normalized; precedence is unaffected.
    pub fn with_extra_keywords(extra: &HashMap<CategoryLabel, Vec<String>>) -> Self {
        let tables = CategoryLabel::PRECEDENCE
            .iter()
            .map(|label| {
                let mut keywords: HashSet<String> = label
                    .default_keywords()
                    .iter()
                    .map(|k| k.to_string())
                    .collect();
                if let Some(configured) = extra.get(label) {
                    keywords.extend(
                        configured
                            .iter()
                            .map(|k| normalize(k))
                            .filter(|k| !k.is_empty()),
                    );
                }
                (*label, keywords)
            })
            .collect();

        if extra.contains_key(&CategoryLabel::Other) {
            log::warn!("Keywords configured for Other are ignored; it is the fallback category");
        }

        Self { tables }
    }

    pub fn classify(&self, ingredient_name: &str) -> CategoryLabel {
        let text = NormalizedText::new(ingredient_name);
        if text.is_empty() {
            return CategoryLabel::Other;
        }

        for (label, keywords) in &self.tables {
            if text.tokens.iter().any(|token| keywords.contains(token)) {
                return *label;
            }
        }

        log::debug!("No category keyword in {:?}, using Other", text.normalized);
        CategoryLabel::Other
    }

    pub fn keyword_count(&self, label: CategoryLabel) -> usize {
        self.tables
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, keywords)| keywords.len())
            .unwrap_or(0)
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Category selector offered to the pantry view: every item, or one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    Only(CategoryLabel),
}

impl CategoryFilter {
    pub fn matches(&self, label: CategoryLabel) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(expected) => *expected == label,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("ALL"),
            CategoryFilter::Only(label) => f.write_str(label.as_str()),
        }
    }
}

/// Distinct categories present, in precedence order, prefixed with `All`.
pub fn category_list<I>(labels: I) -> Vec<CategoryFilter>
where
    I: IntoIterator<Item = CategoryLabel>,
{
    let present: HashSet<CategoryLabel> = labels.into_iter().collect();
    let mut list = vec![CategoryFilter::All];
    list.extend(
        CategoryLabel::PRECEDENCE
            .iter()
            .chain(std::iter::once(&CategoryLabel::Other))
            .filter(|label| present.contains(label))
            .map(|label| CategoryFilter::Only(*label)),
    );
    list
}
