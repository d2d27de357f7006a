//! `ProgressStore`: the single owner and writer of `ProgressState`.
//!
//! Every operation mutates the in-memory state first, then writes the
//! complete snapshot to the storage slot. Operations never fail: unknown
//! catalog ids are ignored, a corrupt snapshot falls back to defaults, and
//! storage errors are logged and otherwise ignored.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::catalog::{self, Subject};
use super::state::{AvatarPatch, ProgressState};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::{KeyValueStore, MemoryStorage};

pub struct ProgressStore {
    state: ProgressState,
    storage: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    config: StoreConfig,
    initialized: bool,
}

impl ProgressStore {
    /// Build a store holding the logged-out default state. Call `restore`
    /// once afterwards to pick up a persisted snapshot.
    pub fn new(storage: Box<dyn KeyValueStore>, clock: Box<dyn Clock>, config: StoreConfig) -> Self {
        Self {
            state: ProgressState::default(),
            storage,
            clock,
            config,
            initialized: false,
        }
    }

    /// Store backed by a throwaway in-memory slot and the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStorage::new()),
            Box::new(SystemClock),
            StoreConfig::default(),
        )
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Adopt the persisted snapshot, if any. Only the first call reads
    /// storage; later calls would overwrite live progress with stale data.
    pub fn restore(&mut self) {
        if self.initialized {
            debug!("restore skipped, store already initialized");
            return;
        }
        self.initialized = true;

        let key = self.config.storage_key.clone();
        match self.storage.read(&key) {
            Ok(Some(blob)) => match ProgressState::from_json(&blob) {
                Ok(state) => {
                    info!(xp = state.xp, streak = state.streak, "restored progress snapshot");
                    self.state = state;
                }
                Err(e) => warn!("ignoring unreadable progress snapshot: {}", e),
            },
            Ok(None) => debug!("no progress snapshot under {}", key),
            Err(e) => warn!("could not read progress snapshot: {}", e),
        }
    }

    /// Start a session for `name`. Badges are reset and `first-login` is
    /// earned; XP starts at the login amount rather than adding a badge bonus.
    pub fn login(&mut self, name: &str, email: &str) {
        let now = self.clock.now();
        let state = &mut self.state;

        state.is_logged_in = true;
        state.profile.name = name.to_string();
        state.profile.email = if email.is_empty() {
            None
        } else {
            Some(email.to_string())
        };
        state.streak = 1;
        state.last_active = Some(now);
        state.badges = catalog::default_badges();
        if let Some(badge) = state.badge_mut(catalog::FIRST_LOGIN) {
            badge.earn(now);
        }
        state.xp = self.config.rewards.login_xp;

        info!("learner logged in");
        self.persist();
    }

    /// Drop everything and clear the storage slot.
    pub fn logout(&mut self) {
        self.state = ProgressState::default();
        if let Err(e) = self.storage.delete(&self.config.storage_key) {
            warn!("could not clear progress snapshot: {}", e);
        }
        info!("learner logged out");
    }

    // ── Profile ────────────────────────────────────────────────────

    /// Record onboarding answers. Completion is a separate step.
    pub fn update_onboarding(&mut self, age: u8, favorite_color: &str, subjects: BTreeSet<Subject>) {
        let profile = &mut self.state.profile;
        profile.age = Some(age);
        profile.favorite_color = favorite_color.to_string();
        profile.selected_subjects = subjects;
        debug!(age, subjects = profile.selected_subjects.len(), "onboarding updated");
        self.persist();
    }

    pub fn complete_onboarding(&mut self) {
        self.state.profile.onboarding_completed = true;
        self.persist();
    }

    pub fn update_avatar(&mut self, patch: AvatarPatch) {
        self.state.profile.settings.avatar.merge(patch);
        self.persist();
    }

    // ── XP, streak, badges, challenges ─────────────────────────────

    pub fn add_xp(&mut self, amount: u32) {
        self.state.xp = self.state.xp.saturating_add(amount);
        debug!(amount, xp = self.state.xp, "xp added");
        self.persist();
    }

    /// Count today's visit toward the daily streak.
    ///
    /// Yesterday → +1, today → unchanged, anything else (including a date in
    /// the future) → back to 1. Dates compare as calendar days in the current
    /// UTC offset.
    pub fn update_streak(&mut self) {
        let now = self.clock.now();
        let today = now.date_naive();

        let changed = match self.state.last_active {
            None => {
                self.state.streak = 1;
                self.state.last_active = Some(now);
                true
            }
            Some(last) => {
                let last_day = last.with_timezone(now.offset()).date_naive();
                if last_day == today {
                    false
                } else if today.pred_opt() == Some(last_day) {
                    self.state.streak = self.state.streak.saturating_add(1);
                    self.state.last_active = Some(now);
                    if self.state.streak >= self.config.rewards.streak_badge_days {
                        self.unlock_badge(catalog::STREAK_3);
                    }
                    true
                } else {
                    debug!(streak = self.state.streak, "streak lapsed");
                    self.state.streak = 1;
                    self.state.last_active = Some(now);
                    true
                }
            }
        };

        if changed {
            debug!(streak = self.state.streak, "streak updated");
            self.persist();
        }
    }

    /// Unlock a badge and pay the badge bonus. Unknown or already-earned ids
    /// are ignored.
    pub fn earn_badge(&mut self, badge_id: &str) {
        if self.unlock_badge(badge_id) {
            self.persist();
        }
    }

    /// Move a challenge's progress by `delta`. The completion bonus is paid
    /// the first time the challenge completes and never again until the
    /// catalog is reset by logout.
    pub fn update_challenge_progress(&mut self, challenge_id: &str, delta: i64) {
        let bonus = self.config.rewards.challenge_xp;
        let Some(challenge) = self.state.challenge_mut(challenge_id) else {
            debug!("unknown challenge {}", challenge_id);
            return;
        };

        let completed_now = challenge.apply_delta(delta);
        let pay = completed_now && !challenge.bonus_awarded;
        if pay {
            challenge.bonus_awarded = true;
        }
        debug!(
            challenge = challenge_id,
            progress = challenge.progress,
            total = challenge.total,
            "challenge progress"
        );

        if pay {
            self.state.xp = self.state.xp.saturating_add(bonus);
            info!(challenge = challenge_id, "challenge completed");
        }
        self.persist();
    }

    // ── Export / import ────────────────────────────────────────────

    /// Snapshot as URL-safe base64, for a downloadable player data file.
    pub fn export_progress(&self) -> Result<String> {
        let json = self.state.to_json()?;
        Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
    }

    /// Replace the live state with an exported snapshot. On error the
    /// current state is left untouched.
    pub fn import_progress(&mut self, state_b64: &str) -> Result<()> {
        let bytes = URL_SAFE_NO_PAD.decode(state_b64.trim())?;
        let state = ProgressState::from_slice(&bytes)?;
        self.state = state;
        info!("progress imported");
        self.persist();
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    fn unlock_badge(&mut self, badge_id: &str) -> bool {
        let now = self.clock.now();
        let Some(badge) = self.state.badge_mut(badge_id) else {
            debug!("unknown badge {}", badge_id);
            return false;
        };
        if !badge.earn(now) {
            return false;
        }
        self.state.xp = self.state.xp.saturating_add(self.config.rewards.badge_xp);
        info!(badge = badge_id, "badge earned");
        true
    }

    fn persist(&mut self) {
        let json = match self.state.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("could not encode progress snapshot: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(&self.config.storage_key, &json) {
            warn!("could not persist progress snapshot: {}", e);
        }
    }
}
