//! Progress state: profile, XP, streak, badges and challenges.
//!
//! The whole `ProgressState` is the persisted snapshot. Field names are
//! camelCase with the profile flattened to the top level and the avatar under
//! `settings.avatar`, which is the layout the browser app already keeps in
//! localStorage.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::catalog::{self, Subject};
use crate::error::Result;

/// One-time achievement from the badge catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub earned: bool,
    /// Present iff `earned`.
    #[serde(rename = "earnedDate", default, skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<DateTime<FixedOffset>>,
}

impl Badge {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            earned: false,
            earned_at: None,
        }
    }

    /// Mark earned. Returns false (and changes nothing) if already earned.
    pub fn earn(&mut self, at: DateTime<FixedOffset>) -> bool {
        if self.earned {
            return false;
        }
        self.earned = true;
        self.earned_at = Some(at);
        true
    }
}

/// Bounded counter toward a fixed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub progress: u32,
    pub total: u32,
    pub completed: bool,
    /// Set once the completion bonus has been paid.
    #[serde(default)]
    pub bonus_awarded: bool,
}

impl Challenge {
    pub fn new(id: &str, name: &str, description: &str, total: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            progress: 0,
            total,
            completed: total == 0,
            bonus_awarded: false,
        }
    }

    /// Move progress by `delta`, clamped to `[0, total]`, and recompute
    /// `completed`. Returns true when this call completed the challenge.
    pub fn apply_delta(&mut self, delta: i64) -> bool {
        let was_completed = self.completed;
        let next = (self.progress as i64)
            .saturating_add(delta)
            .clamp(0, self.total as i64);
        self.progress = next as u32;
        self.completed = self.progress >= self.total;
        !was_completed && self.completed
    }

    /// Rounded completion percentage for progress bars.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.progress as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Avatar {
    pub hair: String,
    pub eyes: String,
    pub skin: String,
    pub clothes: String,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            hair: "default".to_string(),
            eyes: "default".to_string(),
            skin: "default".to_string(),
            clothes: "default".to_string(),
        }
    }
}

/// Partial avatar update. `None` leaves that trait alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarPatch {
    pub hair: Option<String>,
    pub eyes: Option<String>,
    pub skin: Option<String>,
    pub clothes: Option<String>,
}

impl AvatarPatch {
    pub fn is_empty(&self) -> bool {
        self.hair.is_none() && self.eyes.is_none() && self.skin.is_none() && self.clothes.is_none()
    }
}

impl Avatar {
    pub fn merge(&mut self, patch: AvatarPatch) {
        if let Some(hair) = patch.hair {
            self.hair = hair;
        }
        if let Some(eyes) = patch.eyes {
            self.eyes = eyes;
        }
        if let Some(skin) = patch.skin {
            self.skin = skin;
        }
        if let Some(clothes) = patch.clothes {
            self.clothes = clothes;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub avatar: Avatar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: Option<String>,
    pub age: Option<u8>,
    pub favorite_color: String,
    pub selected_subjects: BTreeSet<Subject>,
    pub settings: Settings,
    pub onboarding_completed: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: None,
            age: None,
            favorite_color: catalog::DEFAULT_COLOR.to_string(),
            selected_subjects: BTreeSet::new(),
            settings: Settings::default(),
            onboarding_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    #[serde(flatten)]
    pub profile: Profile,
    pub is_logged_in: bool,
    pub xp: u32,
    pub streak: u32,
    pub last_active: Option<DateTime<FixedOffset>>,
    pub badges: Vec<Badge>,
    pub challenges: Vec<Challenge>,
}

impl Default for ProgressState {
    /// Logged-out state with fresh catalogs.
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            is_logged_in: false,
            xp: 0,
            streak: 0,
            last_active: None,
            badges: catalog::default_badges(),
            challenges: catalog::default_challenges(),
        }
    }
}

impl ProgressState {
    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn badge_mut(&mut self, id: &str) -> Option<&mut Badge> {
        self.badges.iter_mut().find(|b| b.id == id)
    }

    pub fn challenge(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn challenge_mut(&mut self, id: &str) -> Option<&mut Challenge> {
        self.challenges.iter_mut().find(|c| c.id == id)
    }

    /// Earned badges in catalog order.
    pub fn earned_badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|b| b.earned)
    }

    /// Serialize the full snapshot.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot produced by `to_json` (or by the browser app).
    pub fn from_json(json: &str) -> Result<Self> {
        let mut state: Self = serde_json::from_str(json)?;
        state.reconcile();
        Ok(state)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut state: Self = serde_json::from_slice(bytes)?;
        state.reconcile();
        Ok(state)
    }

    /// Rebuild badges and challenges from the catalog, carrying over what
    /// the snapshot recorded for each known id. Unknown ids are dropped.
    ///
    /// Afterwards: progress is within `[0, total]`, `completed` matches
    /// `progress >= total`, `earnedDate` is present iff `earned`, and a
    /// challenge the snapshot already completed never pays its bonus again.
    pub fn reconcile(&mut self) {
        let mut badges = catalog::default_badges();
        for badge in &mut badges {
            let Some(saved) = self.badge(&badge.id) else {
                continue;
            };
            if let (true, Some(at)) = (saved.earned, saved.earned_at) {
                badge.earned = true;
                badge.earned_at = Some(at);
            }
        }

        let mut challenges = catalog::default_challenges();
        for challenge in &mut challenges {
            let Some(saved) = self.challenge(&challenge.id) else {
                continue;
            };
            challenge.progress = saved.progress.min(challenge.total);
            challenge.completed = challenge.progress >= challenge.total;
            challenge.bonus_awarded =
                saved.bonus_awarded || saved.completed || challenge.completed;
        }

        self.badges = badges;
        self.challenges = challenges;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn default_state_is_logged_out() {
        let state = ProgressState::default();
        assert!(!state.is_logged_in);
        assert_eq!(state.xp, 0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.profile.favorite_color, "#6366f1");
        assert_eq!(state.profile.settings.avatar.hair, "default");
        assert_eq!(state.earned_badges().count(), 0);
    }

    #[test]
    fn badge_earn_is_one_way() {
        let mut badge = Badge::new("x", "X", "");
        assert!(badge.earn(at("2024-03-10T09:00:00+02:00")));
        assert!(!badge.earn(at("2024-03-11T09:00:00+02:00")));
        assert_eq!(badge.earned_at, Some(at("2024-03-10T09:00:00+02:00")));
    }

    #[test]
    fn challenge_delta_clamps_both_ends() {
        let mut challenge = Challenge::new("c", "C", "", 3);
        assert!(!challenge.apply_delta(-4));
        assert_eq!(challenge.progress, 0);
        assert!(!challenge.apply_delta(2));
        assert!(challenge.apply_delta(5));
        assert_eq!(challenge.progress, 3);
        assert!(challenge.completed);
        assert!(!challenge.apply_delta(1));
        assert!(!challenge.apply_delta(-1));
        assert!(!challenge.completed);
        assert_eq!(challenge.progress, 2);
    }

    #[test]
    fn challenge_extreme_delta_does_not_overflow() {
        let mut challenge = Challenge::new("c", "C", "", 5);
        challenge.apply_delta(i64::MAX);
        assert_eq!(challenge.progress, 5);
        challenge.apply_delta(i64::MIN);
        assert_eq!(challenge.progress, 0);
    }

    #[test]
    fn challenge_percent_rounds() {
        let mut challenge = Challenge::new("c", "C", "", 3);
        challenge.apply_delta(1);
        assert_eq!(challenge.percent(), 33);
        challenge.apply_delta(1);
        assert_eq!(challenge.percent(), 67);
    }

    #[test]
    fn avatar_merge_keeps_unspecified_traits() {
        let mut avatar = Avatar::default();
        avatar.merge(AvatarPatch {
            hair: Some("curly".to_string()),
            clothes: Some("hoodie".to_string()),
            ..Default::default()
        });
        assert_eq!(avatar.hair, "curly");
        assert_eq!(avatar.eyes, "default");
        assert_eq!(avatar.skin, "default");
        assert_eq!(avatar.clothes, "hoodie");
    }

    #[test]
    fn snapshot_uses_browser_layout() {
        let mut state = ProgressState::default();
        state.profile.name = "Ama".to_string();
        state.profile.selected_subjects.insert(Subject::Animals);
        let json = state.to_json().unwrap();
        assert!(json.contains(r#""name":"Ama""#));
        assert!(json.contains(r#""isLoggedIn":false"#));
        assert!(json.contains(r#""selectedSubjects":["animals"]"#));
        assert!(json.contains(r#""settings":{"avatar":{"#));
        assert!(json.contains(r#""onboardingCompleted":false"#));
    }

    #[test]
    fn snapshot_roundtrip_is_exact() {
        let mut state = ProgressState::default();
        state.is_logged_in = true;
        state.profile.name = "Kofi".to_string();
        state.profile.email = Some("kofi@example.com".to_string());
        state.profile.age = Some(7);
        state.xp = 140;
        state.streak = 4;
        state.last_active = Some(at("2024-03-10T18:45:12.345+02:00"));
        state.badges[0].earn(at("2024-03-07T08:00:00+02:00"));
        state.challenges[1].apply_delta(2);

        let restored = ProgressState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn reads_snapshot_written_by_browser_app() {
        let json = r##"{
            "isLoggedIn": true,
            "initialized": true,
            "name": "Ama",
            "email": "",
            "age": 8,
            "favoriteColor": "#22c55e",
            "selectedSubjects": ["animals", "space"],
            "streak": 2,
            "lastActive": "2024-03-10T07:00:00.000Z",
            "xp": 60,
            "badges": [
                {"id": "first-login", "name": "First Day of School",
                 "description": "Logged in for the first time",
                 "earned": true, "earnedDate": "2024-03-09T07:00:00.000Z"}
            ],
            "challenges": [
                {"id": "play-games", "name": "Game Explorer",
                 "description": "Play 2 different games",
                 "completed": false, "progress": 1, "total": 2}
            ],
            "settings": {"avatar": {"hair": "long", "eyes": "star", "skin": "tan", "clothes": "dress"}},
            "onboardingCompleted": true
        }"##;

        let state = ProgressState::from_json(json).unwrap();
        assert_eq!(state.profile.name, "Ama");
        assert_eq!(state.profile.age, Some(8));
        assert!(state.profile.selected_subjects.contains(&Subject::Space));
        assert_eq!(state.profile.settings.avatar.skin, "tan");
        assert!(state.badge("first-login").unwrap().earned);
        assert_eq!(state.challenge("play-games").unwrap().progress, 1);
        assert!(!state.challenge("play-games").unwrap().bonus_awarded);
    }

    #[test]
    fn legacy_snapshot_gets_full_badge_catalog() {
        let json = r#"{
            "isLoggedIn": true,
            "name": "Ama",
            "badges": [
                {"id": "first-login", "name": "First Day of School", "description": "",
                 "earned": true, "earnedDate": "2024-03-09T07:00:00.000Z"},
                {"id": "streak-3", "name": "Streak", "description": "", "earned": false},
                {"id": "shapes-master", "name": "Shapes", "description": "", "earned": false},
                {"id": "animals-expert", "name": "Retired", "description": "",
                 "earned": true, "earnedDate": "2024-03-09T07:00:00.000Z"},
                {"id": "alphabet-ace", "name": "ABC", "description": "", "earned": false}
            ]
        }"#;

        let state = ProgressState::from_json(json).unwrap();
        let ids: Vec<&str> = state.badges.iter().map(|b| b.id.as_str()).collect();
        let catalog_ids: Vec<String> = catalog::default_badges().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, catalog_ids);
        assert!(state.badge(catalog::FIRST_LOGIN).unwrap().earned);
        assert!(state.badge("animals-expert").is_none());
        assert!(!state.badge(catalog::ANIMALS_MASTER).unwrap().earned);
        assert_eq!(state.earned_badges().count(), 1);
    }

    #[test]
    fn earned_flag_and_date_agree_after_load() {
        let json = r#"{"badges": [
            {"id": "first-login", "name": "", "description": "", "earned": true},
            {"id": "streak-3", "name": "", "description": "",
             "earned": false, "earnedDate": "2024-03-09T07:00:00.000Z"}
        ]}"#;

        let state = ProgressState::from_json(json).unwrap();
        for badge in &state.badges {
            assert_eq!(badge.earned, badge.earned_at.is_some(), "{}", badge.id);
        }
        assert_eq!(state.earned_badges().count(), 0);
    }

    #[test]
    fn out_of_range_challenge_is_clamped_on_load() {
        let json = r#"{"challenges": [
            {"id": "complete-quizzes", "name": "", "description": "",
             "completed": false, "progress": 9, "total": 3},
            {"id": "bogus", "name": "", "description": "",
             "completed": true, "progress": 1, "total": 1}
        ]}"#;

        let state = ProgressState::from_json(json).unwrap();
        let quizzes = state.challenge(catalog::COMPLETE_QUIZZES).unwrap();
        assert_eq!(quizzes.progress, 3);
        assert_eq!(quizzes.total, 3);
        assert!(quizzes.completed);
        assert!(state.challenge("bogus").is_none());
        assert_eq!(state.challenges.len(), catalog::default_challenges().len());
    }

    #[test]
    fn completed_challenge_without_bonus_flag_counts_as_paid() {
        let json = r#"{"challenges": [
            {"id": "play-games", "name": "", "description": "",
             "completed": true, "progress": 2, "total": 2}
        ]}"#;

        let state = ProgressState::from_json(json).unwrap();
        assert!(state.challenge(catalog::PLAY_GAMES).unwrap().bonus_awarded);
        assert!(!state.challenge(catalog::DAILY_FACTS).unwrap().bonus_awarded);
    }

    #[test]
    fn malformed_snapshot_is_error() {
        assert!(ProgressState::from_json("not valid json {{{").is_err());
        assert!(ProgressState::from_json(r#"{"xp": -5}"#).is_err());
    }
}
