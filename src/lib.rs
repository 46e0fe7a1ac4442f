// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portal - User Management Service
//!
//! HTTP backend for user records. Protected routes require a bearer token
//! whose payload carries a bcrypt hash of the user id, presented together
//! with the claimed id in `x-key`.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token issuance, verification and route exemptions
//! - `config` - Environment configuration
//! - `storage` - User records (redb)
//! - `telemetry` - Logging setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
