use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-token claims as issued by the auth provider.
///
/// The `sub` field is the user's UUID. The core never *verifies* tokens
/// (that is the backend's job); it only introspects its own token to learn
/// who is signed in and whether the token is still current.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The auth user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// User's email.
    pub email: Option<String>,
    /// Auth role (e.g. "authenticated").
    pub role: Option<String>,
    /// Metadata from the OAuth provider.
    pub user_metadata: Option<UserMetadata>,
}

/// Metadata populated by the OAuth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// Best-effort display name from metadata.
    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    /// Best-effort email: prefer top-level, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }

    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        (self.exp as i64) <= now_unix
    }
}

/// Decode a token's claims without verifying the signature.
pub fn decode_claims(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    // Whatever the issuer signed with: we are reading, not trusting.
    validation.algorithms = vec![Algorithm::HS256, Algorithm::ES256, Algorithm::RS256];

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Failed to decode token: {e}"))
}

/// The signed-in user as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Client-side auth state. Mutations check it before touching the network;
/// anonymous callers get a login redirect instead of an error.
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<String>,
    user: Option<CurrentUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// Build a session from an access token. An expired or unreadable token
    /// yields an anonymous session rather than an error: the user simply is
    /// not signed in anymore.
    pub fn from_token(token: &str) -> Self {
        let claims = match decode_claims(token) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::debug!(%reason, "access token unreadable, treating as anonymous");
                return Self::anonymous();
            }
        };
        if claims.is_expired_at(Utc::now().timestamp()) {
            tracing::debug!("access token expired, treating as anonymous");
            return Self::anonymous();
        }
        let user_id = match claims.user_id() {
            Ok(id) => id,
            Err(reason) => {
                tracing::debug!(%reason, "access token has no usable subject");
                return Self::anonymous();
            }
        };
        Self {
            token: Some(token.to_string()),
            user: Some(CurrentUser {
                id: user_id,
                email: claims.user_email(),
                display_name: claims.display_name(),
            }),
        }
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Build the login redirect carrying the caller's return path, e.g.
/// `/login?return_to=%2Fworkspace%2Ffavorites`.
pub fn login_redirect(login_path: &str, return_to: &str) -> String {
    format!("{login_path}?return_to={}", urlencoding::encode(return_to))
}
