use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::AdminUser,
    repository::RepositoryState,
};

/// Issued tokens stay valid for 24 hours; the console re-authenticates after that.
const TOKEN_TTL_SECS: usize = 60 * 60 * 24;

/// Claims
///
/// Payload of the JWTs minted by POST /auth/login. Signed with the
/// configured secret and checked again on every protected request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin account id, matched against admin_users on each request.
    pub sub: Uuid,
    /// Role claim, serialized as `usertype` because the console decodes exactly
    /// that name client-side to gate admin routes ('admin' or 'superadmin').
    #[serde(rename = "usertype")]
    pub role: String,
    /// Unix timestamp after which the token is dead.
    pub exp: usize,
    /// Unix timestamp of issuance.
    pub iat: usize,
}

/// issue_token
///
/// Signs a fresh JWT for a verified admin account. Called exclusively by the
/// login handler after the password check has passed.
pub fn issue_token(config: &AppConfig, admin: &AdminUser) -> Result<String, String> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: admin.id,
        role: admin.role.clone(),
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("failed to sign token: {e}"))
}

/// hash_password
///
/// Argon2id hash in PHC string format, salted per call. Used when seeding the
/// local admin account; production accounts arrive pre-hashed.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("failed to hash password: {e}"))
}

/// verify_password
///
/// Constant-time verification of a candidate password against a stored PHC
/// string. An unparseable hash verifies as false rather than erroring, so a
/// corrupted row cannot be logged in to.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash).map_or(false, |parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// AuthUser
///
/// Identity a request resolved to after passing authentication. Handlers
/// take it as an argument and read the id and role off it; the role check
/// for console access happens there, not in the extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Key into admin_users.
    pub id: Uuid,
    /// Current role of the account, 'admin' or 'superadmin'.
    pub role: String,
}

impl AuthUser {
    /// Both roles unlock the full console today; the split exists so future
    /// superadmin-only operations do not need a token format change.
    pub fn is_admin(&self) -> bool {
        matches!(self.role.as_str(), "admin" | "superadmin")
    }
}

/// FromRequestParts is what lets a handler simply declare `auth: AuthUser`
/// and never see unauthenticated traffic. Resolution order: local header
/// bypass first (dev only), then Bearer token decode, then a lookup of the
/// account row so deleted accounts and stale role claims lose instantly.
/// Every failure mode collapses to a bare 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // The two state slices the extractor needs, pulled via FromRef.
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // Dev bypass: in Env::Local an 'x-admin-id' header holding a known
        // admin UUID stands in for a token. The UUID must still map to a
        // real account so the role is loaded from the database, not invented.
        if config.env == Env::Local {
            if let Some(admin_id_header) = parts.headers.get("x-admin-id") {
                if let Ok(id_str) = admin_id_header.to_str() {
                    if let Ok(admin_id) = Uuid::parse_str(id_str) {
                        if let Some(admin) = repo.get_admin(admin_id).await {
                            return Ok(AuthUser {
                                id: admin.id,
                                role: admin.role,
                            });
                        }
                    }
                }
            }
        }
        // In production, or when the bypass header is absent or does not
        // resolve, the request continues into the normal token path.

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let secret = &config.jwt_secret;
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::default();

        // Expiry checking must never be turned off, whatever the defaults do.
        validation.validate_exp = true;

        let token_data = match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                match e.kind() {
                    // Old-but-once-valid tokens land here once they pass exp.
                    ErrorKind::ExpiredSignature => return Err(StatusCode::UNAUTHORIZED),
                    // Bad signature, garbage input, wrong algorithm: same answer.
                    _ => return Err(StatusCode::UNAUTHORIZED),
                }
            }
        };

        let admin_id = token_data.claims.sub;

        // The claim only identifies the account. Existence and role come from
        // the current row, so deletion after issuance revokes access.
        let admin = repo
            .get_admin(admin_id)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: admin.id,
            role: admin.role,
        })
    }
}
