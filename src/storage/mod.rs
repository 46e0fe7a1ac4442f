// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent user records in a single redb file. The database path comes
//! from `DB_PATH` (see [`crate::config`]).

pub mod users;

pub use users::{
    DbHealth, NewUser, StoredUser, UserChanges, UserDatabase, UserDbError, UserDbResult,
};
