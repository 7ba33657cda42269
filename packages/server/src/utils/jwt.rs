use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience the identity provider stamps on user session tokens.
pub const AUDIENCE: &str = "authenticated";

/// JWT claims issued by the external identity provider.
///
/// Other provider claims such as `user_metadata` are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub aud: String,
    pub exp: usize,
}

/// Verify an HS256 token and decode its claims.
///
/// Signature, expiry and audience are all checked.
pub fn verify(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign claims with the shared secret. Tokens are normally minted by the
/// identity provider; this exists for tooling and tests.
pub fn sign(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
