//! Activity rewards layered on top of the store.
//!
//! Quizzes and games pay XP by score tier and move their challenge forward;
//! a top-tier score also unlocks the matching badge. Badges are earned before
//! the tier XP is added, so the badge bonus and tier XP both land.

use tracing::debug;

use super::catalog::{self, Game, Subject};
use super::store::ProgressStore;
use crate::config::RewardConfig;

/// XP for a score percentage. With the default rewards: 80+ → 50,
/// 60+ → 30, anything else → 10.
pub fn tier_xp(rewards: &RewardConfig, percent: u32) -> u32 {
    if percent >= rewards.top_tier_percent {
        rewards.top_tier_xp
    } else if percent >= rewards.mid_tier_percent {
        rewards.mid_tier_xp
    } else {
        rewards.base_tier_xp
    }
}

/// Floor percentage of correct answers. An empty quiz scores 0.
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct.min(total) as u64 * 100 / total as u64) as u32
}

/// Apply a finished subject quiz. Returns the tier XP awarded.
pub fn record_quiz(store: &mut ProgressStore, subject: Subject, correct: u32, total: u32) -> u32 {
    let percent = percentage(correct, total);
    let rewards = store.config().rewards.clone();
    if percent >= rewards.top_tier_percent {
        if let Some(badge) = subject.mastery_badge() {
            store.earn_badge(badge);
        }
    }
    let xp = tier_xp(&rewards, percent);
    store.add_xp(xp);
    store.update_challenge_progress(catalog::COMPLETE_QUIZZES, 1);
    debug!(subject = subject.as_str(), percent, xp, "quiz recorded");
    xp
}

/// Apply a finished mini-game with a 0-100 score. Returns the tier XP.
pub fn record_game(store: &mut ProgressStore, game: Game, score: u32) -> u32 {
    let rewards = store.config().rewards.clone();
    if score >= rewards.top_tier_percent {
        store.earn_badge(game.badge());
        store.earn_badge(catalog::GAME_WINNER);
    }
    let xp = tier_xp(&rewards, score);
    store.add_xp(xp);
    store.update_challenge_progress(catalog::PLAY_GAMES, 1);
    debug!(game = game.as_str(), score, xp, "game recorded");
    xp
}

/// Reaching the last item of a lesson.
pub fn record_lesson_complete(store: &mut ProgressStore) -> u32 {
    let xp = store.config().rewards.lesson_xp;
    store.add_xp(xp);
    xp
}

/// Reading one of the daily facts on the home page.
pub fn record_daily_fact(store: &mut ProgressStore) {
    store.update_challenge_progress(catalog::DAILY_FACTS, 1);
}
