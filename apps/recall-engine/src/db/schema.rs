//! SQLite schema definitions.

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Per-connection settings. Foreign key enforcement is off by default in SQLite.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Complete schema for the study database.
pub const SCHEMA: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE CHECK (length(trim(username)) > 0),
    email TEXT NOT NULL UNIQUE CHECK (length(trim(email)) > 0),
    credential TEXT NOT NULL
);

-- Decks, owned by one user
CREATE TABLE IF NOT EXISTS decks (
    deck_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0)
);

-- Cards, owned by one deck
CREATE TABLE IF NOT EXISTS cards (
    card_id INTEGER PRIMARY KEY AUTOINCREMENT,
    deck_id INTEGER NOT NULL REFERENCES decks(deck_id) ON DELETE CASCADE,
    question TEXT NOT NULL,
    answer TEXT NOT NULL
);

-- Session summaries, append-only
CREATE TABLE IF NOT EXISTS quiz (
    result_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    deck_id INTEGER NOT NULL REFERENCES decks(deck_id) ON DELETE CASCADE,
    total_cards INTEGER NOT NULL CHECK (total_cards >= 0),
    correct_count INTEGER NOT NULL CHECK (correct_count >= 0 AND correct_count <= total_cards),
    avg_time REAL NOT NULL CHECK (avg_time >= 0),
    deck_time REAL NOT NULL CHECK (deck_time >= 0),
    timestamp TEXT NOT NULL
);

-- Per-(user, card) scheduling state
CREATE TABLE IF NOT EXISTS spaced_rep (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    card_id INTEGER NOT NULL REFERENCES cards(card_id) ON DELETE CASCADE,
    repetition INTEGER NOT NULL DEFAULT 0 CHECK (repetition >= 0),
    interval_minutes INTEGER NOT NULL DEFAULT 2 CHECK (interval_minutes > 0),
    ef REAL NOT NULL DEFAULT 2.5 CHECK (ef >= 1.3),
    next_review_at TEXT NOT NULL,
    last_time_taken REAL NOT NULL DEFAULT 0,
    is_correct INTEGER,
    UNIQUE (user_id, card_id)
);

CREATE INDEX IF NOT EXISTS idx_decks_user ON decks(user_id);
CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id);
CREATE INDEX IF NOT EXISTS idx_quiz_user_deck ON quiz(user_id, deck_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_spaced_rep_card ON spaced_rep(card_id);
"#;
