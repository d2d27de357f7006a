//! Fixed catalogs: subjects, games, badges, challenges and avatar options.
//!
//! Catalog ids are stable keys that end up in persisted snapshots. Only the
//! earned/progress fields of a badge or challenge ever change at runtime.

use serde::{Deserialize, Serialize};

use super::state::{Badge, Challenge};

// ── Badge and challenge ids ────────────────────────────────────────

pub const FIRST_LOGIN: &str = "first-login";
pub const STREAK_3: &str = "streak-3";
pub const SHAPES_MASTER: &str = "shapes-master";
pub const ANIMALS_MASTER: &str = "animals-master";
pub const ALPHABET_ACE: &str = "alphabet-ace";
pub const GAME_WINNER: &str = "game-winner";
pub const MEMORY_MASTER: &str = "memory-master";
pub const SORTING_EXPERT: &str = "sorting-expert";
pub const MATH_WIZARD: &str = "math-wizard";
pub const SPELLING_CHAMPION: &str = "spelling-champion";
pub const GEOGRAPHY_EXPLORER: &str = "geography-explorer";

pub const DAILY_FACTS: &str = "daily-facts";
pub const COMPLETE_QUIZZES: &str = "complete-quizzes";
pub const PLAY_GAMES: &str = "play-games";

/// (id, name, description), in display order.
const BADGES: [(&str, &str, &str); 11] = [
    (FIRST_LOGIN, "First Day of School", "Logged in for the first time"),
    (STREAK_3, "On a Roll", "Maintained a 3-day streak"),
    (SHAPES_MASTER, "Shape Master", "Completed all shape lessons and quizzes"),
    (ANIMALS_MASTER, "Animal Expert", "Aced the animals quiz"),
    (ALPHABET_ACE, "Alphabet Ace", "Learned all the alphabets"),
    (GAME_WINNER, "Game Winner", "Won an educational game"),
    (MEMORY_MASTER, "Memory Master", "Scored 80% or more in the memory game"),
    (SORTING_EXPERT, "Sorting Expert", "Scored 80% or more in the sorting game"),
    (MATH_WIZARD, "Math Wizard", "Scored 80% or more in the math game"),
    (SPELLING_CHAMPION, "Spelling Champion", "Scored 80% or more in the spelling game"),
    (GEOGRAPHY_EXPLORER, "Geography Explorer", "Scored 80% or more in the geography game"),
];

/// (id, name, description, total)
const CHALLENGES: [(&str, &str, &str, u32); 3] = [
    (DAILY_FACTS, "Fact Finder", "Read 5 daily facts", 5),
    (COMPLETE_QUIZZES, "Quiz Whiz", "Complete 3 quizzes", 3),
    (PLAY_GAMES, "Game Explorer", "Play 2 different games", 2),
];

/// Fresh badge catalog with nothing earned.
pub fn default_badges() -> Vec<Badge> {
    BADGES
        .iter()
        .map(|&(id, name, description)| Badge::new(id, name, description))
        .collect()
}

/// Fresh challenge catalog with zero progress.
pub fn default_challenges() -> Vec<Challenge> {
    CHALLENGES
        .iter()
        .map(|&(id, name, description, total)| Challenge::new(id, name, description, total))
        .collect()
}

// ── Subjects ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Shapes,
    Fruits,
    Vegetables,
    Animals,
    Math,
    History,
    Space,
    Ocean,
    Country,
    Alphabets,
}

impl Subject {
    pub const ALL: [Subject; 10] = [
        Subject::Shapes,
        Subject::Fruits,
        Subject::Vegetables,
        Subject::Animals,
        Subject::Math,
        Subject::History,
        Subject::Space,
        Subject::Ocean,
        Subject::Country,
        Subject::Alphabets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Shapes => "shapes",
            Subject::Fruits => "fruits",
            Subject::Vegetables => "vegetables",
            Subject::Animals => "animals",
            Subject::Math => "math",
            Subject::History => "history",
            Subject::Space => "space",
            Subject::Ocean => "ocean",
            Subject::Country => "country",
            Subject::Alphabets => "alphabets",
        }
    }

    /// Badge earned by scoring 80% or more on this subject's quiz, if any.
    pub fn mastery_badge(self) -> Option<&'static str> {
        match self {
            Subject::Shapes => Some(SHAPES_MASTER),
            Subject::Animals => Some(ANIMALS_MASTER),
            Subject::Alphabets => Some(ALPHABET_ACE),
            _ => None,
        }
    }
}

/// Case-insensitive subject lookup.
pub fn parse_subject(s: &str) -> Option<Subject> {
    let s = s.trim();
    Subject::ALL
        .into_iter()
        .find(|subject| subject.as_str().eq_ignore_ascii_case(s))
}

// ── Games ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    Memory,
    DragAndDrop,
    Math,
    Spelling,
    Geography,
}

impl Game {
    pub const ALL: [Game; 5] = [
        Game::Memory,
        Game::DragAndDrop,
        Game::Math,
        Game::Spelling,
        Game::Geography,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Game::Memory => "memory",
            Game::DragAndDrop => "drag-and-drop",
            Game::Math => "math",
            Game::Spelling => "spelling",
            Game::Geography => "geography",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Game::Memory => MEMORY_MASTER,
            Game::DragAndDrop => SORTING_EXPERT,
            Game::Math => MATH_WIZARD,
            Game::Spelling => SPELLING_CHAMPION,
            Game::Geography => GEOGRAPHY_EXPLORER,
        }
    }
}

pub fn parse_game(s: &str) -> Option<Game> {
    let s = s.trim();
    Game::ALL
        .into_iter()
        .find(|game| game.as_str().eq_ignore_ascii_case(s))
}

// ── Avatar options ─────────────────────────────────────────────────

pub const HAIR_OPTIONS: [&str; 4] = ["default", "curly", "long", "short"];
pub const EYES_OPTIONS: [&str; 4] = ["default", "round", "sleepy", "star"];
pub const SKIN_OPTIONS: [&str; 4] = ["default", "tan", "brown", "fair"];
pub const CLOTHES_OPTIONS: [&str; 4] = ["default", "tshirt", "hoodie", "dress"];

/// Onboarding color swatches as (name, hex token). The first is the default.
pub const COLOR_OPTIONS: [(&str, &str); 8] = [
    ("Purple", "#6366f1"),
    ("Blue", "#3b82f6"),
    ("Cyan", "#22d3ee"),
    ("Green", "#22c55e"),
    ("Yellow", "#facc15"),
    ("Orange", "#fb923c"),
    ("Red", "#ef4444"),
    ("Pink", "#ec4899"),
];

pub const DEFAULT_COLOR: &str = COLOR_OPTIONS[0].1;
