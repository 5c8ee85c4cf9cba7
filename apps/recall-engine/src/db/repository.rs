//! Repository pattern for database access.

use crate::config::StoreLocation;
use crate::db::date_utils::{format_timestamp, optional_timestamp_column, timestamp_column};
use crate::db::error::DbError;
use crate::db::schema;
use chrono::NaiveDateTime;
use recall_core::priority::DeckEase;
use recall_core::types::{
    Card, CardId, Deck, DeckId, DeckInfo, DueCard, ResultId, ScheduleEntry, ScheduleState,
    SessionCounters, SessionSummary, User, UserId, UserTotals, DEFAULT_EASE,
};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::time::Duration;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for user operations.
pub trait UserRepository {
    fn create_user(&self, username: &str, email: &str, credential: &str) -> Result<UserId>;
    fn get_user(&self, id: UserId) -> Result<Option<User>>;
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn update_user(&self, user: &User) -> Result<()>;
    fn delete_user(&self, id: UserId) -> Result<bool>;
    fn user_totals(&self, id: UserId) -> Result<UserTotals>;
}

/// Repository for deck operations.
pub trait DeckRepository {
    fn create_deck(&self, user_id: UserId, name: &str) -> Result<DeckId>;
    fn get_deck(&self, id: DeckId) -> Result<Option<Deck>>;
    fn list_decks(&self, user_id: UserId) -> Result<Vec<Deck>>;
    fn list_deck_infos(&self, user_id: UserId) -> Result<Vec<DeckInfo>>;
    fn rename_deck(&self, id: DeckId, name: &str) -> Result<bool>;
    fn delete_deck(&self, id: DeckId) -> Result<bool>;
    /// Ease totals per deck of a user, optionally restricted to one deck.
    fn deck_ease(&self, user_id: UserId, deck_id: Option<DeckId>) -> Result<Vec<DeckEase>>;
}

/// Repository for card operations.
pub trait CardRepository {
    fn create_card(&self, deck_id: DeckId, question: &str, answer: &str) -> Result<CardId>;
    fn get_card(&self, id: CardId) -> Result<Option<Card>>;
    fn list_cards(&self, deck_id: DeckId) -> Result<Vec<Card>>;
    fn count_cards(&self, deck_id: DeckId) -> Result<usize>;
    fn update_card(&self, id: CardId, question: &str, answer: &str) -> Result<bool>;
    fn delete_card(&self, id: CardId) -> Result<bool>;
    fn due_cards(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<DueCard>>;
    fn due_count(&self, user_id: UserId, deck_id: DeckId, now: NaiveDateTime) -> Result<usize>;
}

/// Repository for per-(user, card) scheduling rows.
pub trait ScheduleRepository {
    fn get_schedule(&self, user_id: UserId, card_id: CardId) -> Result<Option<ScheduleEntry>>;
    fn upsert_schedule(&self, entry: &ScheduleEntry) -> Result<()>;
    fn set_last_correct(&self, user_id: UserId, card_id: CardId, is_correct: bool) -> Result<bool>;
}

/// Repository for session summaries.
pub trait SessionRepository {
    fn append_session(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        counters: &SessionCounters,
        timestamp: NaiveDateTime,
    ) -> Result<ResultId>;
    fn get_session(&self, id: ResultId) -> Result<Option<SessionSummary>>;
    /// Latest stored session timestamp across all users.
    fn latest_session_timestamp(&self) -> Result<Option<NaiveDateTime>>;
    /// Sessions of a user, optionally for one deck, oldest first.
    fn list_sessions(&self, user_id: UserId, deck_id: Option<DeckId>) -> Result<Vec<SessionSummary>>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open a connection to `location`, creating the schema if necessary.
    pub fn open(location: &StoreLocation, busy_timeout: Duration) -> Result<Self> {
        let conn = match location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Connection::open(path)?
            }
            StoreLocation::Memory(_) => Connection::open_with_flags(
                location.uri(),
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
        };
        conn.busy_timeout(busy_timeout)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open a private in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        self.conn.execute_batch(schema::SCHEMA)?;
        self.conn
            .pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        Ok(())
    }

    /// Run `f` inside one transaction. Any error rolls everything back.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            user_id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            credential: row.get(3)?,
        })
    }

    fn row_to_deck(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
        Ok(Deck {
            deck_id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
        })
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
        Ok(Card {
            card_id: row.get(0)?,
            deck_id: row.get(1)?,
            question: row.get(2)?,
            answer: row.get(3)?,
        })
    }

    fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<SessionSummary> {
        Ok(SessionSummary {
            result_id: row.get(0)?,
            user_id: row.get(1)?,
            deck_id: row.get(2)?,
            total_cards: row.get(3)?,
            correct_count: row.get(4)?,
            avg_time: row.get(5)?,
            deck_time: row.get(6)?,
            timestamp: timestamp_column(row, 7)?,
        })
    }
}

impl UserRepository for SqliteRepository {
    fn create_user(&self, username: &str, email: &str, credential: &str) -> Result<UserId> {
        self.conn.execute(
            "INSERT INTO users (username, email, credential) VALUES (?1, ?2, ?3)",
            params![username, email, credential],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_id, username, email, credential FROM users WHERE user_id = ?1",
                params![id],
                Self::row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_id, username, email, credential FROM users WHERE username = ?1",
                params![username],
                Self::row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE users SET username = ?1, email = ?2, credential = ?3 WHERE user_id = ?4",
            params![user.username, user.email, user.credential, user.user_id],
        )?;
        if changed == 0 {
            return Err(DbError::not_found("user", user.user_id));
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE user_id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn user_totals(&self, id: UserId) -> Result<UserTotals> {
        self.conn
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM decks WHERE user_id = ?1),
                    (SELECT COUNT(*) FROM cards c JOIN decks d ON c.deck_id = d.deck_id
                     WHERE d.user_id = ?1)",
                params![id],
                |row| {
                    Ok(UserTotals {
                        total_decks: row.get::<_, i64>(0)? as usize,
                        total_cards: row.get::<_, i64>(1)? as usize,
                    })
                },
            )
            .map_err(Into::into)
    }
}

impl DeckRepository for SqliteRepository {
    fn create_deck(&self, user_id: UserId, name: &str) -> Result<DeckId> {
        self.conn.execute(
            "INSERT INTO decks (user_id, name) VALUES (?1, ?2)",
            params![user_id, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_deck(&self, id: DeckId) -> Result<Option<Deck>> {
        self.conn
            .query_row(
                "SELECT deck_id, user_id, name FROM decks WHERE deck_id = ?1",
                params![id],
                Self::row_to_deck,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_decks(&self, user_id: UserId) -> Result<Vec<Deck>> {
        let mut stmt = self.conn.prepare(
            "SELECT deck_id, user_id, name FROM decks WHERE user_id = ?1 ORDER BY deck_id",
        )?;
        let decks = stmt
            .query_map(params![user_id], Self::row_to_deck)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(decks)
    }

    fn list_deck_infos(&self, user_id: UserId) -> Result<Vec<DeckInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.deck_id, d.name, COUNT(c.card_id)
             FROM decks d
             LEFT JOIN cards c ON c.deck_id = d.deck_id
             WHERE d.user_id = ?1
             GROUP BY d.deck_id, d.name
             ORDER BY d.deck_id",
        )?;
        let infos = stmt
            .query_map(params![user_id], |row| {
                Ok(DeckInfo {
                    deck_id: row.get(0)?,
                    name: row.get(1)?,
                    card_count: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(infos)
    }

    fn rename_deck(&self, id: DeckId, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE decks SET name = ?1 WHERE deck_id = ?2",
            params![name, id],
        )?;
        Ok(changed > 0)
    }

    fn delete_deck(&self, id: DeckId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM decks WHERE deck_id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn deck_ease(&self, user_id: UserId, deck_id: Option<DeckId>) -> Result<Vec<DeckEase>> {
        let sql = match deck_id {
            Some(_) => "SELECT d.deck_id, d.name, COUNT(c.card_id),
                    COALESCE(SUM(CASE WHEN c.card_id IS NULL THEN 0 ELSE COALESCE(s.ef, ?2) END), 0)
                FROM decks d
                LEFT JOIN cards c ON c.deck_id = d.deck_id
                LEFT JOIN spaced_rep s ON s.card_id = c.card_id AND s.user_id = d.user_id
                WHERE d.user_id = ?1 AND d.deck_id = ?3
                GROUP BY d.deck_id, d.name
                ORDER BY d.deck_id",
            None => "SELECT d.deck_id, d.name, COUNT(c.card_id),
                    COALESCE(SUM(CASE WHEN c.card_id IS NULL THEN 0 ELSE COALESCE(s.ef, ?2) END), 0)
                FROM decks d
                LEFT JOIN cards c ON c.deck_id = d.deck_id
                LEFT JOIN spaced_rep s ON s.card_id = c.card_id AND s.user_id = d.user_id
                WHERE d.user_id = ?1
                GROUP BY d.deck_id, d.name
                ORDER BY d.deck_id",
        };

        let row_to_ease = |row: &rusqlite::Row| -> rusqlite::Result<DeckEase> {
            Ok(DeckEase {
                deck_id: row.get(0)?,
                name: row.get(1)?,
                card_count: row.get::<_, i64>(2)? as usize,
                ef_sum: row.get(3)?,
            })
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = if let Some(id) = deck_id {
            stmt.query_map(params![user_id, DEFAULT_EASE, id], row_to_ease)?
        } else {
            stmt.query_map(params![user_id, DEFAULT_EASE], row_to_ease)?
        };

        rows.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl CardRepository for SqliteRepository {
    fn create_card(&self, deck_id: DeckId, question: &str, answer: &str) -> Result<CardId> {
        self.conn.execute(
            "INSERT INTO cards (deck_id, question, answer) VALUES (?1, ?2, ?3)",
            params![deck_id, question, answer],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        self.conn
            .query_row(
                "SELECT card_id, deck_id, question, answer FROM cards WHERE card_id = ?1",
                params![id],
                Self::row_to_card,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_cards(&self, deck_id: DeckId) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, deck_id, question, answer FROM cards WHERE deck_id = ?1 ORDER BY card_id",
        )?;
        let cards = stmt
            .query_map(params![deck_id], Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    fn count_cards(&self, deck_id: DeckId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cards WHERE deck_id = ?1",
            params![deck_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn update_card(&self, id: CardId, question: &str, answer: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE cards SET question = ?1, answer = ?2 WHERE card_id = ?3",
            params![question, answer, id],
        )?;
        Ok(changed > 0)
    }

    fn delete_card(&self, id: CardId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE card_id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn due_cards(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<DueCard>> {
        let now = format_timestamp(now);
        let mut stmt = self.conn.prepare(
            "SELECT c.card_id, c.question, c.answer, COALESCE(s.next_review_at, ?3) AS due_at
             FROM cards c
             LEFT JOIN spaced_rep s ON s.card_id = c.card_id AND s.user_id = ?1
             WHERE c.deck_id = ?2 AND (s.next_review_at IS NULL OR s.next_review_at <= ?3)
             ORDER BY due_at ASC, c.card_id ASC
             LIMIT ?4",
        )?;
        let cards = stmt
            .query_map(params![user_id, deck_id, now, limit], |row| {
                Ok(DueCard {
                    card_id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                    next_review_at: timestamp_column(row, 3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    fn due_count(&self, user_id: UserId, deck_id: DeckId, now: NaiveDateTime) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM cards c
             LEFT JOIN spaced_rep s ON s.card_id = c.card_id AND s.user_id = ?1
             WHERE c.deck_id = ?2 AND (s.next_review_at IS NULL OR s.next_review_at <= ?3)",
            params![user_id, deck_id, format_timestamp(now)],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl ScheduleRepository for SqliteRepository {
    fn get_schedule(&self, user_id: UserId, card_id: CardId) -> Result<Option<ScheduleEntry>> {
        self.conn
            .query_row(
                "SELECT user_id, card_id, repetition, interval_minutes, ef, next_review_at,
                        last_time_taken, is_correct
                 FROM spaced_rep WHERE user_id = ?1 AND card_id = ?2",
                params![user_id, card_id],
                |row| {
                    Ok(ScheduleEntry {
                        user_id: row.get(0)?,
                        card_id: row.get(1)?,
                        state: ScheduleState {
                            repetition: row.get(2)?,
                            interval_minutes: row.get(3)?,
                            ease_factor: row.get(4)?,
                            next_review_at: timestamp_column(row, 5)?,
                        },
                        last_time_taken: row.get(6)?,
                        last_is_correct: row.get(7)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    fn upsert_schedule(&self, entry: &ScheduleEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO spaced_rep (user_id, card_id, repetition, interval_minutes, ef,
                                     next_review_at, last_time_taken, is_correct)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (user_id, card_id) DO UPDATE SET
                repetition = excluded.repetition,
                interval_minutes = excluded.interval_minutes,
                ef = excluded.ef,
                next_review_at = excluded.next_review_at,
                last_time_taken = excluded.last_time_taken,
                is_correct = excluded.is_correct",
            params![
                entry.user_id,
                entry.card_id,
                entry.state.repetition,
                entry.state.interval_minutes,
                entry.state.ease_factor,
                format_timestamp(entry.state.next_review_at),
                entry.last_time_taken,
                entry.last_is_correct,
            ],
        )?;
        Ok(())
    }

    fn set_last_correct(&self, user_id: UserId, card_id: CardId, is_correct: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE spaced_rep SET is_correct = ?1 WHERE user_id = ?2 AND card_id = ?3",
            params![is_correct, user_id, card_id],
        )?;
        Ok(changed > 0)
    }
}

impl SessionRepository for SqliteRepository {
    fn append_session(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        counters: &SessionCounters,
        timestamp: NaiveDateTime,
    ) -> Result<ResultId> {
        self.conn.execute(
            "INSERT INTO quiz (user_id, deck_id, total_cards, correct_count, avg_time, deck_time, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                deck_id,
                counters.total_cards,
                counters.correct_count,
                counters.avg_time,
                counters.deck_time,
                format_timestamp(timestamp),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_session(&self, id: ResultId) -> Result<Option<SessionSummary>> {
        self.conn
            .query_row(
                "SELECT result_id, user_id, deck_id, total_cards, correct_count, avg_time, deck_time, timestamp
                 FROM quiz WHERE result_id = ?1",
                params![id],
                Self::row_to_session,
            )
            .optional()
            .map_err(Into::into)
    }

    fn latest_session_timestamp(&self) -> Result<Option<NaiveDateTime>> {
        self.conn
            .query_row("SELECT MAX(timestamp) FROM quiz", [], |row| {
                optional_timestamp_column(row, 0)
            })
            .map_err(Into::into)
    }

    fn list_sessions(&self, user_id: UserId, deck_id: Option<DeckId>) -> Result<Vec<SessionSummary>> {
        let sql = match deck_id {
            Some(_) => "SELECT result_id, user_id, deck_id, total_cards, correct_count, avg_time, deck_time, timestamp
                FROM quiz
                WHERE user_id = ?1 AND deck_id = ?2
                ORDER BY timestamp, result_id",
            None => "SELECT result_id, user_id, deck_id, total_cards, correct_count, avg_time, deck_time, timestamp
                FROM quiz
                WHERE user_id = ?1
                ORDER BY timestamp, result_id",
        };

        let mut stmt = self.conn.prepare(sql)?;
        let sessions = if let Some(id) = deck_id {
            stmt.query_map(params![user_id, id], Self::row_to_session)?
        } else {
            stmt.query_map(params![user_id], Self::row_to_session)?
        };

        sessions.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }
}
