// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token signing parameters.

/// Seconds in one validity day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Signing parameters shared by [`TokenIssuer`](super::TokenIssuer) and
/// [`TokenVerifier`](super::TokenVerifier).
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AuthSettings {
    /// HMAC secret for the outer token signature
    pub secret: Vec<u8>,
    /// bcrypt cost used for the identity hash
    pub cost: u32,
    /// Token lifetime in whole days
    pub validity_days: u32,
}

impl AuthSettings {
    pub fn new(secret: impl Into<Vec<u8>>, cost: u32, validity_days: u32) -> Self {
        Self {
            secret: secret.into(),
            cost,
            validity_days,
        }
    }

    /// Token lifetime in seconds.
    pub fn validity_secs(&self) -> i64 {
        i64::from(self.validity_days) * SECONDS_PER_DAY
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("cost", &self.cost)
            .field("validity_days", &self.validity_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_is_whole_days() {
        assert_eq!(AuthSettings::new("s", 4, 0).validity_secs(), 0);
        assert_eq!(AuthSettings::new("s", 4, 2).validity_secs(), 172_800);
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", AuthSettings::new("s3cr3t", 4, 1));
        assert!(!rendered.contains("s3cr3t"));
    }
}
