//! Local SQLite record store.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;
pub mod store;

pub use error::DbError;
pub use repository::{
    CardRepository, DeckRepository, ScheduleRepository, SessionRepository, SqliteRepository,
    UserRepository,
};
pub use store::StoreHandle;
