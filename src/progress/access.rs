//! Page gate for authenticated pages.

use serde::Serialize;

use super::state::ProgressState;

pub const START_PATH: &str = "/";
pub const ONBOARDING_PATH: &str = "/onboarding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "gate", content = "to")]
pub enum Gate {
    Allow,
    Redirect(&'static str),
}

/// Logged-out learners go to the start page; learners who have not finished
/// onboarding can only see the onboarding page.
pub fn gate(state: &ProgressState, path: &str) -> Gate {
    if !state.is_logged_in {
        return Gate::Redirect(START_PATH);
    }
    if !state.profile.onboarding_completed && path.trim_end_matches('/') != ONBOARDING_PATH {
        return Gate::Redirect(ONBOARDING_PATH);
    }
    Gate::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_out_goes_to_start() {
        let state = ProgressState::default();
        assert_eq!(gate(&state, "/dashboard"), Gate::Redirect("/"));
        assert_eq!(gate(&state, "/onboarding"), Gate::Redirect("/"));
    }

    #[test]
    fn onboarding_required_first() {
        let mut state = ProgressState::default();
        state.is_logged_in = true;
        assert_eq!(gate(&state, "/games"), Gate::Redirect("/onboarding"));
        assert_eq!(gate(&state, "/onboarding"), Gate::Allow);
        assert_eq!(gate(&state, "/onboarding/"), Gate::Allow);
    }

    #[test]
    fn onboarded_learner_allowed() {
        let mut state = ProgressState::default();
        state.is_logged_in = true;
        state.profile.onboarding_completed = true;
        assert_eq!(gate(&state, "/subject/animals"), Gate::Allow);
    }

    #[test]
    fn gate_serializes_tagged() {
        let json = serde_json::to_string(&Gate::Redirect("/onboarding")).unwrap();
        assert_eq!(json, r#"{"gate":"redirect","to":"/onboarding"}"#);
        let json = serde_json::to_string(&Gate::Allow).unwrap();
        assert_eq!(json, r#"{"gate":"allow"}"#);
    }
}
