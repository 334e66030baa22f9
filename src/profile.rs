//! Profile editing and the whole-object upsert contract with the profile store.
//!
//! Every edit loads the current profile (or an empty one), mutates it and
//! writes the whole object back. There is no partial update and no conflict
//! detection: two concurrent edits to different fields race and the last
//! write wins. Callers that edit from several places must serialize edits.

use crate::diet::DietType;
use crate::models::{CookingSkillLevel, UserProfile};

/// Which tag list of the profile an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagList {
    Allergies,
    Intolerances,
    DislikedIngredients,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEdit {
    AddTag(TagList, String),
    RemoveTag(TagList, String),
    SetDiet(Option<DietType>),
    SetSkillLevel(Option<CookingSkillLevel>),
}

/// External storage for profiles, owned by the data layer.
pub trait ProfileStore {
    /// `Ok(None)` when the user has no profile yet.
    fn load(&mut self, user_id: u64) -> anyhow::Result<Option<UserProfile>>;

    /// Creates or replaces the whole profile and returns the stored copy.
    fn upsert(&mut self, profile: &UserProfile) -> anyhow::Result<UserProfile>;
}

impl UserProfile {
    fn tags_mut(&mut self, list: TagList) -> &mut Vec<String> {
        match list {
            TagList::Allergies => &mut self.allergies,
            TagList::Intolerances => &mut self.intolerances,
            TagList::DislikedIngredients => &mut self.disliked_ingredients,
        }
    }

    /// Adds a trimmed tag unless it is blank or already present.
    pub fn add_tag(&mut self, list: TagList, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return false;
        }
        let tags = self.tags_mut(list);
        if tags.iter().any(|t| t == trimmed) {
            return false;
        }
        tags.push(trimmed.to_string());
        true
    }

    pub fn remove_tag(&mut self, list: TagList, value: &str) -> bool {
        let tags = self.tags_mut(list);
        let before = tags.len();
        tags.retain(|t| t != value);
        tags.len() != before
    }

    /// Applies an edit and reports whether anything changed.
    pub fn apply(&mut self, edit: &ProfileEdit) -> bool {
        match edit {
            ProfileEdit::AddTag(list, value) => self.add_tag(*list, value),
            ProfileEdit::RemoveTag(list, value) => self.remove_tag(*list, value),
            ProfileEdit::SetDiet(diet) => {
                let changed = self.diet_type != *diet;
                self.diet_type = *diet;
                changed
            }
            ProfileEdit::SetSkillLevel(level) => {
                let changed = self.cooking_skill_level != *level;
                self.cooking_skill_level = *level;
                changed
            }
        }
    }
}

/// Read-modify-write of one profile. A missing profile is created empty.
///
/// The edit is always upserted, even when it changed nothing, so the store
/// ends up holding a profile for the user either way.
pub fn edit_profile<S: ProfileStore>(
    store: &mut S,
    user_id: u64,
    edit: &ProfileEdit,
) -> anyhow::Result<UserProfile> {
    let mut profile = match store.load(user_id)? {
        Some(profile) => profile,
        None => {
            log::info!("No profile for user {user_id}, creating an empty one");
            UserProfile::empty(user_id)
        }
    };

    if !profile.apply(edit) {
        log::debug!("Profile edit {edit:?} for user {user_id} changed nothing");
    }

    store.upsert(&profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        profiles: HashMap<u64, UserProfile>,
        writes: usize,
    }

    impl ProfileStore for MemoryStore {
        fn load(&mut self, user_id: u64) -> anyhow::Result<Option<UserProfile>> {
            Ok(self.profiles.get(&user_id).cloned())
        }

        fn upsert(&mut self, profile: &UserProfile) -> anyhow::Result<UserProfile> {
            self.writes += 1;
            self.profiles.insert(profile.user_id, profile.clone());
            Ok(profile.clone())
        }
    }

    struct FailingStore;

    impl ProfileStore for FailingStore {
        fn load(&mut self, _user_id: u64) -> anyhow::Result<Option<UserProfile>> {
            Err(anyhow::anyhow!("profile service unavailable"))
        }

        fn upsert(&mut self, _profile: &UserProfile) -> anyhow::Result<UserProfile> {
            unreachable!("upsert must not run after a failed load")
        }
    }

    #[test]
    fn test_add_tag_trims_and_dedupes() {
        let mut profile = UserProfile::empty(1);
        assert!(profile.add_tag(TagList::Allergies, "  Nueces "));
        assert!(!profile.add_tag(TagList::Allergies, "Nueces"));
        assert!(!profile.add_tag(TagList::Allergies, "   "));
        assert!(profile.add_tag(TagList::Allergies, "nueces"));
        assert_eq!(profile.allergies, vec!["Nueces".to_string(), "nueces".to_string()]);
    }

    #[test]
    fn test_remove_tag() {
        let mut profile = UserProfile::empty(1);
        profile.add_tag(TagList::DislikedIngredients, "cilantro");
        assert!(!profile.remove_tag(TagList::DislikedIngredients, "Cilantro"));
        assert!(profile.remove_tag(TagList::DislikedIngredients, "cilantro"));
        assert!(profile.disliked_ingredients.is_empty());
    }

    #[test]
    fn test_edit_creates_missing_profile() {
        let mut store = MemoryStore::default();
        let saved = edit_profile(
            &mut store,
            42,
            &ProfileEdit::AddTag(TagList::Allergies, "Marisco".into()),
        )
        .unwrap();

        assert_eq!(saved.user_id, 42);
        assert_eq!(saved.allergies, vec!["Marisco".to_string()]);
        assert_eq!(store.profiles[&42], saved);
    }

    #[test]
    fn test_edit_writes_whole_object() {
        let mut store = MemoryStore::default();
        let mut existing = UserProfile::empty(7);
        existing.intolerances = vec!["lactosa".into()];
        store.profiles.insert(7, existing);

        edit_profile(&mut store, 7, &ProfileEdit::SetDiet(Some(DietType::Keto))).unwrap();
        edit_profile(&mut store, 7, &ProfileEdit::SetDiet(Some(DietType::Keto))).unwrap();

        let stored = &store.profiles[&7];
        assert_eq!(stored.diet_type, Some(DietType::Keto));
        assert_eq!(stored.intolerances, vec!["lactosa".to_string()]);
        assert_eq!(store.writes, 2);
    }

    #[test]
    fn test_stale_snapshot_last_write_wins() {
        // Two editors holding the same snapshot: the second upsert drops the first edit.
        let mut store = MemoryStore::default();
        store.profiles.insert(3, UserProfile::empty(3));

        let mut tab_a = store.load(3).unwrap().unwrap();
        let mut tab_b = store.load(3).unwrap().unwrap();
        tab_a.add_tag(TagList::Allergies, "huevo");
        tab_b.add_tag(TagList::DislikedIngredients, "coles");
        store.upsert(&tab_a).unwrap();
        store.upsert(&tab_b).unwrap();

        let stored = &store.profiles[&3];
        assert!(stored.allergies.is_empty());
        assert_eq!(stored.disliked_ingredients, vec!["coles".to_string()]);
    }

    #[test]
    fn test_skill_level_edit() {
        let mut profile = UserProfile::empty(1);
        assert!(profile.apply(&ProfileEdit::SetSkillLevel(Some(CookingSkillLevel::Advanced))));
        assert!(!profile.apply(&ProfileEdit::SetSkillLevel(Some(CookingSkillLevel::Advanced))));
        assert_eq!(profile.cooking_skill_level, Some(CookingSkillLevel::Advanced));
    }

    #[test]
    fn test_store_failure_propagates() {
        let result = edit_profile(&mut FailingStore, 1, &ProfileEdit::SetDiet(None));
        assert!(result.is_err());
    }
}
