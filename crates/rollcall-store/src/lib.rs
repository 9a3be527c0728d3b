//! rollcall-store — durable client preferences on SQLite.

pub mod prefs;

pub use prefs::SqlitePrefs;
