//! SQL schema for the Census SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- `seq` preserves insertion order for listings.
CREATE TABLE IF NOT EXISTS countries (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    country_id   TEXT NOT NULL UNIQUE,
    country_name TEXT NOT NULL UNIQUE
);

-- `country_id` is a weak reference: no foreign key, dangling ids allowed.
CREATE TABLE IF NOT EXISTS persons (
    seq                  INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id            TEXT NOT NULL UNIQUE,
    person_name          TEXT NOT NULL,
    email                TEXT,
    date_of_birth        TEXT,             -- YYYY-MM-DD
    gender               TEXT,             -- 'male' | 'female' | 'other'
    country_id           TEXT,
    address              TEXT,
    receive_news_letters INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS persons_name_idx ON persons(person_name);

PRAGMA user_version = 1;
";
