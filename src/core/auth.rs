//! Access guard for mutating routes
//!
//! Two synchronous stages ahead of every mutation:
//! 1. Authenticate: resolve the bearer credential to a subject
//! 2. Authorize: compare the subject's role against the route's allow-list
//!
//! If either stage fails the store is never invoked.

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

use crate::core::error::AuthError;

/// Roles recognised by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

/// Authorization context extracted from a request
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Authenticated subject
    Subject(Subject),

    /// No credential presented (public access)
    Anonymous,
}

impl AuthContext {
    /// Get the subject's role if authenticated
    pub fn role(&self) -> Option<Role> {
        match self {
            AuthContext::Subject(s) => Some(s.role),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthContext::Anonymous)
    }
}

/// Authorization policy for a route
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated subject
    Authenticated,

    /// Subject must hold one of these roles
    HasRole(&'static [Role]),
}

/// Allow-list for property mutation routes
pub const PROPERTY_MUTATION: AuthPolicy = AuthPolicy::HasRole(&[Role::Admin, Role::Agent]);

/// Allow-list for schedule administration routes
pub const SCHEDULE_ADMIN: AuthPolicy = AuthPolicy::HasRole(&[Role::Admin]);

impl AuthPolicy {
    /// Check if an auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => !context.is_anonymous(),
            AuthPolicy::HasRole(allowed) => match context.role() {
                Some(role) => allowed.contains(&role),
                None => false,
            },
        }
    }
}

/// Trait for credential resolution
///
/// Token issuance and cryptographic verification belong to an external
/// identity collaborator; this trait only maps a presented credential
/// to a subject.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve a bearer token to a subject
    async fn resolve(&self, token: &str) -> Result<Subject, AuthError>;
}

/// An issued token with an optional expiry
#[derive(Debug, Clone)]
struct IssuedToken {
    subject: Subject,
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory token registry
///
/// Maps opaque bearer tokens to subjects. Used in development and tests;
/// production deployments would wire a real identity provider behind
/// [`AuthProvider`].
#[derive(Default)]
pub struct TokenRegistry {
    tokens: RwLock<HashMap<String, IssuedToken>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a non-expiring token for a subject
    pub fn issue(&self, token: impl Into<String>, subject: Subject) {
        self.issue_until(token, subject, None);
    }

    /// Register a token with an expiry
    pub fn issue_until(
        &self,
        token: impl Into<String>,
        subject: Subject,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        tokens.insert(
            token.into(),
            IssuedToken {
                subject,
                expires_at,
            },
        );
    }
}

#[async_trait]
impl AuthProvider for TokenRegistry {
    async fn resolve(&self, token: &str) -> Result<Subject, AuthError> {
        let tokens = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        let issued = tokens.get(token).ok_or_else(|| AuthError::Unauthorized {
            message: "invalid credential".to_string(),
        })?;

        if let Some(expires_at) = issued.expires_at {
            if expires_at <= Utc::now() {
                return Err(AuthError::Unauthorized {
                    message: "credential expired".to_string(),
                });
            }
        }

        Ok(issued.subject.clone())
    }
}

/// Extract the bearer token from request headers
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Run the two-stage guard for a request
///
/// Authenticates the bearer credential, then checks the subject's role
/// against `policy`. Returns the subject on success so handlers can log
/// who performed the mutation.
pub async fn guard(
    provider: &dyn AuthProvider,
    headers: &HeaderMap,
    policy: &AuthPolicy,
) -> Result<Subject, AuthError> {
    let token = bearer_token(headers).ok_or_else(|| AuthError::Unauthorized {
        message: "missing bearer credential".to_string(),
    })?;

    let subject = provider.resolve(token).await?;

    if !policy.check(&AuthContext::Subject(subject.clone())) {
        return Err(AuthError::Forbidden {
            message: format!("role '{}' may not perform this operation", subject.role),
        });
    }

    Ok(subject)
}
