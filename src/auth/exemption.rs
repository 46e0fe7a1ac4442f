// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Paths that may be called without credentials.

use std::collections::{HashMap, HashSet};

/// Static table of `path -> methods` admitted without a token.
///
/// Paths are matched exactly against the already-normalized request path;
/// there is no prefix or wildcard matching.
#[derive(Debug, Clone, Default)]
pub struct ExemptionPolicy {
    routes: HashMap<String, HashSet<String>>,
}

impl ExemptionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `methods` on `path` without authentication.
    pub fn allow<I, M>(mut self, path: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.routes
            .entry(path.into())
            .or_default()
            .extend(methods.into_iter().map(Into::into));
        self
    }

    /// Whether `method` on `path` bypasses authentication.
    pub fn is_exempt(&self, path: &str, method: &str) -> bool {
        self.routes
            .get(path)
            .is_some_and(|methods| methods.contains(method))
    }
}

impl<P, I, M> FromIterator<(P, I)> for ExemptionPolicy
where
    P: Into<String>,
    I: IntoIterator<Item = M>,
    M: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |policy, (path, methods)| policy.allow(path, methods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_get_is_exempt_but_post_is_not() {
        let policy = ExemptionPolicy::new().allow("/", ["GET"]);
        assert!(policy.is_exempt("/", "GET"));
        assert!(!policy.is_exempt("/", "POST"));
    }

    #[test]
    fn lookup_is_exact() {
        let policy = ExemptionPolicy::new().allow("/users", ["GET", "POST"]);
        assert!(policy.is_exempt("/users", "POST"));
        assert!(!policy.is_exempt("/users/1", "GET"));
        assert!(!policy.is_exempt("/users/", "GET"));
        assert!(!policy.is_exempt("/Users", "GET"));
        assert!(!policy.is_exempt("/users", "get"));
    }

    #[test]
    fn unknown_path_is_not_exempt() {
        let policy = ExemptionPolicy::new();
        assert!(!policy.is_exempt("/", "GET"));
    }

    #[test]
    fn builds_from_table() {
        let policy: ExemptionPolicy = [("/", vec!["GET"]), ("/health", vec!["GET"])]
            .into_iter()
            .collect();
        assert!(policy.is_exempt("/health", "GET"));
        assert!(!policy.is_exempt("/health", "DELETE"));
    }

    #[test]
    fn repeated_allow_merges_methods() {
        let policy = ExemptionPolicy::new()
            .allow("/users", ["GET"])
            .allow("/users", ["POST"]);
        assert!(policy.is_exempt("/users", "GET"));
        assert!(policy.is_exempt("/users", "POST"));
    }
}
