//! SQL schema for the SnowOps SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows are never deleted; is_active = 0 marks a tombstone.
CREATE TABLE IF NOT EXISTS organizations (
    id             TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    type           TEXT NOT NULL,   -- 'AKIMAT' | 'TOO' | 'CONTRACTOR'
    bin            TEXT NOT NULL DEFAULT '',
    head_full_name TEXT NOT NULL DEFAULT '',
    address        TEXT NOT NULL DEFAULT '',
    phone          TEXT NOT NULL DEFAULT '',
    parent_org_id  TEXT REFERENCES organizations(id) ON DELETE SET NULL,
    is_active      INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS drivers (
    id            TEXT PRIMARY KEY,
    contractor_id TEXT NOT NULL REFERENCES organizations(id),
    full_name     TEXT NOT NULL,
    iin           TEXT NOT NULL,
    birth_year    INTEGER NOT NULL,
    phone         TEXT NOT NULL,
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id              TEXT PRIMARY KEY,
    phone           TEXT NOT NULL UNIQUE,
    role            TEXT NOT NULL,   -- 'AKIMAT_ADMIN' | 'TOO_ADMIN' | 'CONTRACTOR_ADMIN' | 'DRIVER'
    login           TEXT,
    password_hash   TEXT,            -- argon2 PHC string, never plaintext
    organization_id TEXT REFERENCES organizations(id) ON DELETE SET NULL,
    driver_id       TEXT REFERENCES drivers(id) ON DELETE SET NULL,
    is_active       INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vehicles (
    id             TEXT PRIMARY KEY,
    contractor_id  TEXT NOT NULL REFERENCES organizations(id),
    plate_number   TEXT NOT NULL UNIQUE,
    brand          TEXT NOT NULL DEFAULT '',
    model          TEXT NOT NULL DEFAULT '',
    color          TEXT NOT NULL DEFAULT '',
    year           INTEGER NOT NULL DEFAULT 0,
    body_volume_m3 REAL NOT NULL DEFAULT 0,
    driver_id      TEXT REFERENCES drivers(id) ON DELETE SET NULL,
    is_active      INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS organizations_parent_idx ON organizations(parent_org_id);
CREATE INDEX IF NOT EXISTS users_login_idx          ON users(login);
CREATE INDEX IF NOT EXISTS drivers_contractor_idx   ON drivers(contractor_id);

PRAGMA user_version = 1;
";
