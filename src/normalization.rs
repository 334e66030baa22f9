use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters that separate tokens in ingredient names.
const TOKEN_SEPARATORS: [char; 4] = [',', ';', '.', '-'];

/// A piece of free text together with its canonical form and tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub original: String,
    pub normalized: String,
    pub tokens: Vec<String>,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let normalized = normalize(text);
        let tokens = tokenize(&normalized)
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            original: text.to_string(),
            normalized,
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

/// Canonical matching form: lower-cased, accents stripped, trimmed.
///
/// Accent stripping decomposes to NFD and drops the combining marks, so
/// "Limón" and "LIMON" both become "limon". Applying it twice is a no-op.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Splits on runs of whitespace, commas, semicolons, periods and hyphens.
/// Empty tokens are discarded.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || TOKEN_SEPARATORS.contains(&c))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Substring containment in either direction over already-normalized text.
///
/// Empty input on either side never matches.
pub fn contains_either_way(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}
