// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded user database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user id → serialized StoredUser
//! - `users_by_email`: lowercase email → user id (uniqueness index)
//! - `meta`: key → value (id sequence)

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user id → serialized StoredUser (JSON bytes).
const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Index: lowercase email → user id.
const USERS_BY_EMAIL: TableDefinition<&str, u64> = TableDefinition::new("users_by_email");

/// Metadata: key → value (e.g., "next_user_id" → u64).
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const NEXT_USER_ID: &str = "next_user_id";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UserDbError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Conflict(String),
}

pub type UserDbResult<T> = Result<T, UserDbError>;

// =============================================================================
// Records
// =============================================================================

/// User record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: u64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub public_key: String,
    /// Never exposed via the API
    #[serde(default)]
    pub encrypted_private_key: String,
    #[serde(default)]
    pub otp_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub public_key: String,
    pub encrypted_private_key: String,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub public_key: Option<String>,
    pub encrypted_private_key: Option<String>,
    pub otp_verified: Option<bool>,
}

/// Snapshot returned by [`UserDatabase::health`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbHealth {
    pub users: u64,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// UserDatabase
// =============================================================================

/// Embedded ACID user database.
pub struct UserDatabase {
    db: Database,
}

impl UserDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> UserDbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a new user and assign the next id.
    pub fn create(&self, new_user: NewUser) -> UserDbResult<StoredUser> {
        let key = email_key(&new_user.email);
        let now = Utc::now();

        let write_txn = self.db.begin_write()?;
        let user = {
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            if by_email.get(key.as_str())?.is_some() {
                return Err(UserDbError::Conflict(format!("User with email {key}")));
            }

            let mut meta = write_txn.open_table(META)?;
            let id = meta.get(NEXT_USER_ID)?.map(|v| v.value()).unwrap_or(1);
            meta.insert(NEXT_USER_ID, id + 1)?;

            let user = StoredUser {
                id,
                email: new_user.email.trim().to_string(),
                username: new_user.username,
                public_key: new_user.public_key,
                encrypted_private_key: new_user.encrypted_private_key,
                otp_verified: false,
                created_at: now,
                updated_at: now,
            };

            let json = serde_json::to_vec(&user)?;
            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, json.as_slice())?;
            by_email.insert(key.as_str(), id)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Look up a single user by id.
    pub fn get(&self, id: u64) -> UserDbResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All users in id order.
    pub fn list(&self) -> UserDbResult<Vec<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let mut users = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            users.push(serde_json::from_slice(value.value())?);
        }
        Ok(users)
    }

    /// Apply `changes` to an existing user.
    pub fn update(&self, id: u64, changes: UserChanges) -> UserDbResult<StoredUser> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut users = write_txn.open_table(USERS)?;

            let existing_bytes = {
                let existing = users
                    .get(id)?
                    .ok_or_else(|| UserDbError::NotFound(format!("User {id}")))?;
                existing.value().to_vec()
            };
            let mut user: StoredUser = serde_json::from_slice(&existing_bytes)?;

            if let Some(email) = changes.email {
                let old_key = email_key(&user.email);
                let new_key = email_key(&email);
                if new_key != old_key {
                    let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
                    if by_email.get(new_key.as_str())?.is_some() {
                        return Err(UserDbError::Conflict(format!("User with email {new_key}")));
                    }
                    by_email.remove(old_key.as_str())?;
                    by_email.insert(new_key.as_str(), id)?;
                }
                user.email = email.trim().to_string();
            }
            if let Some(username) = changes.username {
                user.username = username;
            }
            if let Some(public_key) = changes.public_key {
                user.public_key = public_key;
            }
            if let Some(encrypted_private_key) = changes.encrypted_private_key {
                user.encrypted_private_key = encrypted_private_key;
            }
            if let Some(otp_verified) = changes.otp_verified {
                user.otp_verified = otp_verified;
            }
            user.updated_at = Utc::now();

            let json = serde_json::to_vec(&user)?;
            users.insert(id, json.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Delete a user and its email index entry.
    pub fn delete(&self, id: u64) -> UserDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let removed_bytes = users
                .remove(id)?
                .map(|v| v.value().to_vec())
                .ok_or_else(|| UserDbError::NotFound(format!("User {id}")))?;
            let user: StoredUser = serde_json::from_slice(&removed_bytes)?;

            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            by_email.remove(email_key(&user.email).as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Probe the database with a read transaction.
    pub fn health(&self) -> UserDbResult<DbHealth> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        Ok(DbHealth {
            users: table.len()?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
