//! Upsert semantics over a one-to-one relation.
//!
//! A user owns at most one profile (the profile row carries a unique
//! `user_id`). Upserting the user runs a connect-or-create on the profile
//! relation in its update branch; when the lookup already matches the
//! profile the user owns, that must be a no-op on the relation — no second
//! profile, no detach, no field written.
//!
//! [`ops`] holds the operations, [`schema`] the table definitions, and the
//! `repro` binary walks the sequence end to end against `DATABASE_URL`
//! (falling back to an in-memory SQLite database).

pub mod entity;
pub mod ops;
pub mod schema;
