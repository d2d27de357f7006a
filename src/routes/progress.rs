//! `/api/progress/*` routes, the page-facing surface of the session store.
//!
//! Mutations respond with the full snapshot JSON so the caller can re-render
//! from one response. Parameter problems come back as `{"error": ...}` and
//! never touch the store.

use serde_json::json;
use std::collections::BTreeSet;

use crate::app::{with_store, with_store_mut};
use crate::progress::access;
use crate::progress::catalog::{self, Game, Subject, parse_game, parse_subject};
use crate::progress::rewards;
use crate::progress::{AvatarPatch, ProgressStore};
use crate::routes::util::{get_all, get_param, json_error, parse_form_body, parse_query, to_json};

fn snapshot(store: &ProgressStore) -> String {
    to_json(store.state())
}

fn parse_u32(params: &[(String, String)], key: &str) -> Option<u32> {
    get_param(params, key).and_then(|s| s.trim().parse().ok())
}

// ── GET /api/progress/state ────────────────────────────────────────

pub fn handle_state_get(_query: &str) -> String {
    with_store(snapshot)
}

// ── GET /api/progress/dashboard ────────────────────────────────────

/// Handle GET /api/progress/dashboard
/// Earned badges plus challenge progress, with completion percentages.
pub fn handle_dashboard_get(_query: &str) -> String {
    with_store(|store| {
        let state = store.state();
        let badges: Vec<_> = state.earned_badges().collect();
        let challenges: Vec<_> = state
            .challenges
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "name": c.name,
                    "description": c.description,
                    "progress": c.progress,
                    "total": c.total,
                    "completed": c.completed,
                    "percent": c.percent(),
                })
            })
            .collect();
        json!({
            "name": state.profile.name,
            "favoriteColor": state.profile.favorite_color,
            "xp": state.xp,
            "streak": state.streak,
            "earnedBadges": badges,
            "challenges": challenges,
        })
        .to_string()
    })
}

// ── GET /api/progress/catalog ──────────────────────────────────────

/// Handle GET /api/progress/catalog
/// Fixed choices offered by onboarding and the avatar editor.
pub fn handle_catalog_get(_query: &str) -> String {
    let colors: Vec<_> = catalog::COLOR_OPTIONS
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    json!({
        "subjects": Subject::ALL.map(Subject::as_str),
        "games": Game::ALL.map(Game::as_str),
        "colors": colors,
        "avatar": {
            "hair": catalog::HAIR_OPTIONS,
            "eyes": catalog::EYES_OPTIONS,
            "skin": catalog::SKIN_OPTIONS,
            "clothes": catalog::CLOTHES_OPTIONS,
        },
    })
    .to_string()
}

// ── GET /api/progress/gate ─────────────────────────────────────────

/// Handle GET /api/progress/gate?path={page}
pub fn handle_gate_get(query: &str) -> String {
    let params = parse_query(query);
    let path = get_param(&params, "path").unwrap_or("/");
    with_store(|store| to_json(&access::gate(store.state(), path)))
}

// ── POST /api/progress/login, /logout ──────────────────────────────

/// Handle POST /api/progress/login
/// Body: name={name}&email={email}
pub fn handle_login_post(body: &str) -> String {
    let params = parse_form_body(body);
    let name = get_param(&params, "name").unwrap_or("").trim();
    if name.is_empty() {
        return json_error("Missing name parameter");
    }
    let email = get_param(&params, "email").unwrap_or("").trim();
    with_store_mut(|store| {
        store.login(name, email);
        snapshot(store)
    })
}

pub fn handle_logout_post(_body: &str) -> String {
    with_store_mut(|store| {
        store.logout();
        snapshot(store)
    })
}

// ── POST /api/progress/onboarding ──────────────────────────────────

/// Handle POST /api/progress/onboarding
/// Body: age={n}&color={token}&subjects={a,b} (or repeated subjects[]=)
pub fn handle_onboarding_post(body: &str) -> String {
    let params = parse_form_body(body);

    let Some(age) = get_param(&params, "age").and_then(|s| s.trim().parse::<u8>().ok()) else {
        return json_error("Missing or invalid age parameter");
    };
    let color = get_param(&params, "color").unwrap_or("").trim();
    if color.is_empty() {
        return json_error("Missing color parameter");
    }

    let mut subjects = BTreeSet::new();
    for raw in get_all(&params, "subjects") {
        for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
            match parse_subject(name) {
                Some(subject) => {
                    subjects.insert(subject);
                }
                None => return json_error(&format!("Unknown subject: {}", name.trim())),
            }
        }
    }
    if subjects.is_empty() {
        return json_error("Pick at least one subject");
    }

    with_store_mut(|store| {
        store.update_onboarding(age, color, subjects);
        snapshot(store)
    })
}

pub fn handle_onboarding_complete_post(_body: &str) -> String {
    with_store_mut(|store| {
        store.complete_onboarding();
        snapshot(store)
    })
}

// ── POST /api/progress/xp, /streak, /badge, /challenge ─────────────

/// Handle POST /api/progress/xp
/// Body: amount={n}. Negative amounts count as 0.
pub fn handle_xp_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(amount) = get_param(&params, "amount").and_then(|s| s.trim().parse::<i64>().ok())
    else {
        return json_error("Missing or invalid amount parameter");
    };
    let amount = amount.clamp(0, u32::MAX as i64) as u32;
    with_store_mut(|store| {
        store.add_xp(amount);
        snapshot(store)
    })
}

pub fn handle_streak_post(_body: &str) -> String {
    with_store_mut(|store| {
        store.update_streak();
        snapshot(store)
    })
}

/// Handle POST /api/progress/badge
/// Body: id={badge id}
pub fn handle_badge_post(body: &str) -> String {
    let params = parse_form_body(body);
    let id = get_param(&params, "id").unwrap_or("");
    if id.is_empty() {
        return json_error("Missing id parameter");
    }
    with_store_mut(|store| {
        store.earn_badge(id);
        snapshot(store)
    })
}

/// Handle POST /api/progress/challenge
/// Body: id={challenge id}&delta={n} (delta defaults to 1)
pub fn handle_challenge_post(body: &str) -> String {
    let params = parse_form_body(body);
    let id = get_param(&params, "id").unwrap_or("");
    if id.is_empty() {
        return json_error("Missing id parameter");
    }
    let delta = match get_param(&params, "delta") {
        None => 1,
        Some(s) => match s.trim().parse::<i64>() {
            Ok(d) => d,
            Err(_) => return json_error("Invalid delta parameter"),
        },
    };
    with_store_mut(|store| {
        store.update_challenge_progress(id, delta);
        snapshot(store)
    })
}

// ── POST /api/progress/avatar ──────────────────────────────────────

/// Handle POST /api/progress/avatar
/// Body: any subset of hair=&eyes=&skin=&clothes=
pub fn handle_avatar_post(body: &str) -> String {
    let params = parse_form_body(body);
    let pick = |key: &str| {
        get_param(&params, key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let patch = AvatarPatch {
        hair: pick("hair"),
        eyes: pick("eyes"),
        skin: pick("skin"),
        clothes: pick("clothes"),
    };
    if patch.is_empty() {
        return json_error("No avatar traits given");
    }
    with_store_mut(|store| {
        store.update_avatar(patch);
        snapshot(store)
    })
}

// ── POST /api/progress/quiz, /game, /lesson, /fact ─────────────────

/// Handle POST /api/progress/quiz
/// Body: subject={subject}&correct={n}&total={n}
pub fn handle_quiz_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(subject) = get_param(&params, "subject").and_then(parse_subject) else {
        return json_error("Missing or unknown subject parameter");
    };
    let (Some(correct), Some(total)) = (parse_u32(&params, "correct"), parse_u32(&params, "total"))
    else {
        return json_error("Missing or invalid correct/total parameters");
    };
    with_store_mut(|store| {
        let awarded = rewards::record_quiz(store, subject, correct, total);
        reward_response(store, awarded)
    })
}

/// Handle POST /api/progress/game
/// Body: game={game}&score={0-100}
pub fn handle_game_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(game) = get_param(&params, "game").and_then(parse_game) else {
        return json_error("Missing or unknown game parameter");
    };
    let Some(score) = parse_u32(&params, "score") else {
        return json_error("Missing or invalid score parameter");
    };
    with_store_mut(|store| {
        let awarded = rewards::record_game(store, game, score.min(100));
        reward_response(store, awarded)
    })
}

pub fn handle_lesson_post(_body: &str) -> String {
    with_store_mut(|store| {
        let awarded = rewards::record_lesson_complete(store);
        reward_response(store, awarded)
    })
}

pub fn handle_fact_post(_body: &str) -> String {
    with_store_mut(|store| {
        rewards::record_daily_fact(store);
        snapshot(store)
    })
}

fn reward_response(store: &ProgressStore, awarded: u32) -> String {
    json!({ "awarded": awarded, "state": store.state() }).to_string()
}

// ── GET /api/progress/export, POST /api/progress/import ────────────

/// Handle GET /api/progress/export
/// Returns the snapshot as a base64 string for a player data file.
pub fn handle_export_get(_query: &str) -> String {
    with_store(|store| match store.export_progress() {
        Ok(b64) => b64,
        Err(e) => json_error(&e.to_string()),
    })
}

/// Handle POST /api/progress/import
/// Body: state={base64} (or the raw base64 string)
pub fn handle_import_post(body: &str) -> String {
    let params = parse_form_body(body);
    let state_b64 = get_param(&params, "state").unwrap_or(body.trim());
    with_store_mut(|store| match store.import_progress(state_b64) {
        Ok(()) => snapshot(store),
        Err(e) => json_error(&format!("Import failed: {}", e)),
    })
}
