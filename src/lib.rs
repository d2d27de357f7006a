//! Momo learning app progress core, compiled to WASM.
//!
//! Exports `boot(config)` for page startup and
//! `handle_request(method, path, query, body)` for the page to call on every
//! learner action. Uses `matchit` for URL routing, the same router engine
//! that powers Axum.

use wasm_bindgen::prelude::*;

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod routes;
pub mod storage;

/// Routes that only ever read the store.
const READ_ROUTES: [&str; 5] = ["state", "dashboard", "gate", "catalog", "export"];

/// Initialize the session store from a JSON config string (may be empty).
///
/// Returns `"ok"` or `"error: {message}"`.
#[wasm_bindgen]
pub fn boot(config_json: &str) -> String {
    match app::boot(config_json) {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    }
}

/// Process an HTTP-like request against the session store.
///
/// # Arguments
/// * `method`: HTTP method ("GET" or "POST")
/// * `path`: URL path (e.g., "/api/progress/badge")
/// * `query`: Query string (e.g., "?path=/dashboard")
/// * `body`: URL-encoded form body. Empty string for GET requests.
///
/// # Returns
/// A JSON body: the progress snapshot for mutations, or `{"error": ...}`.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    use routes::progress as p;

    let mut router = matchit::Router::new();

    // Read models
    router.insert("/api/progress/state", "state").ok();
    router.insert("/api/progress/dashboard", "dashboard").ok();
    router.insert("/api/progress/gate", "gate").ok();
    router.insert("/api/progress/catalog", "catalog").ok();
    router.insert("/api/progress/export", "export").ok();

    // Store operations
    router.insert("/api/progress/login", "login").ok();
    router.insert("/api/progress/logout", "logout").ok();
    router.insert("/api/progress/onboarding", "onboarding").ok();
    router.insert("/api/progress/onboarding/complete", "onboarding_complete").ok();
    router.insert("/api/progress/xp", "xp").ok();
    router.insert("/api/progress/streak", "streak").ok();
    router.insert("/api/progress/badge", "badge").ok();
    router.insert("/api/progress/challenge", "challenge").ok();
    router.insert("/api/progress/avatar", "avatar").ok();
    router.insert("/api/progress/import", "import").ok();

    // Activity rewards
    router.insert("/api/progress/quiz", "quiz").ok();
    router.insert("/api/progress/game", "game").ok();
    router.insert("/api/progress/lesson", "lesson").ok();
    router.insert("/api/progress/fact", "fact").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            // Writing before restore would replace the saved snapshot with defaults.
            (route, "POST") if !READ_ROUTES.contains(&route) && !app::is_booted() => not_booted(),

            ("state", "GET") => p::handle_state_get(query),
            ("dashboard", "GET") => p::handle_dashboard_get(query),
            ("gate", "GET") => p::handle_gate_get(query),
            ("catalog", "GET") => p::handle_catalog_get(query),
            ("export", "GET") => p::handle_export_get(query),

            ("login", "POST") => p::handle_login_post(body),
            ("logout", "POST") => p::handle_logout_post(body),
            ("onboarding", "POST") => p::handle_onboarding_post(body),
            ("onboarding_complete", "POST") => p::handle_onboarding_complete_post(body),
            ("xp", "POST") => p::handle_xp_post(body),
            ("streak", "POST") => p::handle_streak_post(body),
            ("badge", "POST") => p::handle_badge_post(body),
            ("challenge", "POST") => p::handle_challenge_post(body),
            ("avatar", "POST") => p::handle_avatar_post(body),
            ("import", "POST") => p::handle_import_post(body),

            ("quiz", "POST") => p::handle_quiz_post(body),
            ("game", "POST") => p::handle_game_post(body),
            ("lesson", "POST") => p::handle_lesson_post(body),
            ("fact", "POST") => p::handle_fact_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    routes::util::json_error("404: route not found")
}

fn method_not_allowed() -> String {
    routes::util::json_error("405: method not allowed")
}

fn not_booted() -> String {
    routes::util::json_error("409: call boot() before updating progress")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressStore;

    fn reset() {
        let mut store = ProgressStore::in_memory();
        store.restore();
        app::replace_store(store);
    }

    #[test]
    fn returns_404_for_unknown_route() {
        let json = handle_request("GET", "/api/nonexistent", "", "");
        assert!(json.contains("404"));
    }

    #[test]
    fn returns_405_for_wrong_method() {
        let json = handle_request("GET", "/api/progress/login", "", "");
        assert!(json.contains("405"));
        let json = handle_request("POST", "/api/progress/state", "", "");
        assert!(json.contains("405"));
    }

    #[test]
    fn writes_wait_for_boot() {
        app::replace_store(ProgressStore::in_memory());
        let json = handle_request("POST", "/api/progress/login", "", "name=Ama");
        assert!(json.contains("409"));
        assert!(!app::with_store(|s| s.state().is_logged_in));
        let json = handle_request("POST", "/api/progress/state", "", "");
        assert!(json.contains("405"));

        // Reads are fine before boot.
        let json = handle_request("GET", "/api/progress/state", "", "");
        assert!(json.contains(r#""isLoggedIn":false"#));

        assert_eq!(boot(""), "ok");
        let json = handle_request("POST", "/api/progress/login", "", "name=Ama");
        assert!(json.contains(r#""isLoggedIn":true"#));
        reset();
    }

    #[test]
    fn boot_reports_config_errors() {
        reset();
        assert!(boot("{broken").starts_with("error: invalid config"));
        assert_eq!(boot(""), "ok");
        reset();
    }

    #[test]
    fn routes_first_session() {
        reset();
        handle_request("POST", "/api/progress/login", "", "name=Ama&email=");
        handle_request(
            "POST",
            "/api/progress/onboarding",
            "",
            "age=8&color=%2322c55e&subjects=animals",
        );
        handle_request("POST", "/api/progress/onboarding/complete", "", "");
        handle_request("POST", "/api/progress/badge", "", "id=animals-master");
        let json = handle_request(
            "POST",
            "/api/progress/challenge",
            "",
            "id=complete-quizzes&delta=3",
        );
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["xp"], 90);
        assert_eq!(v["onboardingCompleted"], true);
        assert_eq!(v["challenges"][1]["completed"], true);

        let json = handle_request(
            "POST",
            "/api/progress/challenge",
            "",
            "id=complete-quizzes&delta=1",
        );
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["xp"], 90);
        assert_eq!(v["challenges"][1]["progress"], 3);
        reset();
    }

    #[test]
    fn routes_streak_same_day_is_stable() {
        reset();
        handle_request("POST", "/api/progress/login", "", "name=Ama");
        let json = handle_request("POST", "/api/progress/streak", "", "");
        assert!(json.contains(r#""streak":1"#));
        reset();
    }

    #[test]
    fn routes_logout_clears() {
        reset();
        handle_request("POST", "/api/progress/login", "", "name=Ama");
        let json = handle_request("POST", "/api/progress/logout", "", "");
        assert!(json.contains(r#""isLoggedIn":false"#));
        assert!(json.contains(r#""xp":0"#));
        reset();
    }
}
