use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AuthToken;

/// The authenticated principal attached to a request. Populated by the
/// upstream token layer before any resolver runs; resolvers only check for
/// its presence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurrentUser {
    pub subject: String,
}

impl CurrentUser {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Seam for the external identity layer. Token issuance lives outside this
/// service; implementations only decide whether a presented token maps to a
/// known subject.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<CurrentUser>;
}

/// Verifier backed by tokens configured at startup.
pub struct StaticTokenVerifier {
    subjects_by_token: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: Vec<AuthToken>) -> Self {
        let subjects_by_token = tokens
            .into_iter()
            .map(|t| (t.token, t.subject))
            .collect();
        Self { subjects_by_token }
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Option<CurrentUser> {
        self.subjects_by_token
            .get(token)
            .map(|subject| CurrentUser::new(subject.clone()))
    }
}

/// Resolves the request's bearer token to a `CurrentUser`, honouring the
/// local development bypass.
#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<dyn TokenVerifier>,
}

impl Authenticator {
    pub fn new(verifier: impl TokenVerifier + 'static) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    pub fn authenticate(&self, token: Option<&str>) -> Option<CurrentUser> {
        if let Some(token) = token {
            if let Some(user) = self.verifier.verify(token) {
                return Some(user);
            }
            tracing::debug!("bearer token did not match any configured subject");
        }

        if local_auth_bypass_enabled() {
            return Some(CurrentUser::new("local"));
        }

        None
    }
}

fn local_auth_bypass_enabled() -> bool {
    std::env::var("CREWBOARD_LOCAL_AUTH_BYPASS")
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}
