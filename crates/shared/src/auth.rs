//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of token carried in the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token sent with every API request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// JWT claims for access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Username at the time of issuance.
    pub username: String,
    /// Whether the user may use the admin surface.
    pub is_staff: bool,
    /// Access or refresh.
    pub token_type: TokenType,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: &str,
        is_staff: bool,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            is_staff,
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access: String,
    /// Refresh token (long-lived).
    pub refresh: String,
}

/// Token request payload (`POST /token`).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh: String,
}

/// Response to a successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Newly issued access token.
    pub access: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub password2: String,
    /// Optional first name.
    #[serde(default)]
    pub first_name: String,
    /// Optional last name.
    #[serde(default)]
    pub last_name: String,
}

/// User profile returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Staff flag.
    pub is_staff: bool,
    /// When the user registered.
    pub date_joined: DateTime<Utc>,
}

impl UserInfo {
    /// First and last name joined, or `None` when both are blank.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}
