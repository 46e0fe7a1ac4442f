// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthSettings, ExemptionPolicy, TokenIssuer, TokenVerifier};
use crate::storage::UserDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<UserDatabase>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub exemptions: Arc<ExemptionPolicy>,
}

impl AppState {
    pub fn new(db: UserDatabase, auth: &AuthSettings, exemptions: ExemptionPolicy) -> Self {
        Self {
            db: Arc::new(db),
            issuer: Arc::new(TokenIssuer::new(auth)),
            verifier: Arc::new(TokenVerifier::new(auth)),
            exemptions: Arc::new(exemptions),
        }
    }
}
