//! JWT service for access token generation and validation
//!
//! Tokens are signed either with a shared secret (HS256) or with an RSA key
//! pair (RS256). Services that only verify tokens can be configured with the
//! public key alone.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ids::UserId;

/// Key material used to sign and verify tokens
#[derive(Debug, Clone)]
pub enum JwtKeys {
    /// Shared secret, HS256
    Secret(String),
    /// RSA key pair in PEM format, RS256. The private key is optional for
    /// services that only verify tokens.
    Rsa {
        private_key: Option<String>,
        public_key: String,
    },
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub keys: JwtKeys,
    /// Access token expiration time in seconds (default: 1 day)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared HS256 secret. Takes precedence over the RSA keys.
    /// - `JWT_PRIVATE_KEY`: Private key for signing tokens (PEM format) or path to private key file
    /// - `JWT_PUBLIC_KEY`: Public key for verifying tokens (PEM format) or path to public key file
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if secret.is_empty() {
                anyhow::bail!("JWT_SECRET must not be empty");
            }
            return Ok(JwtConfig {
                keys: JwtKeys::Secret(secret),
                access_token_expiry,
            });
        }

        let public_key = std::env::var("JWT_PUBLIC_KEY").map_err(|_| {
            anyhow::anyhow!("Neither JWT_SECRET nor JWT_PUBLIC_KEY environment variable is set")
        })?;
        let public_key = read_pem(&public_key)?;

        let private_key = match std::env::var("JWT_PRIVATE_KEY") {
            Ok(value) => Some(read_pem(&value)?),
            Err(_) => None,
        };

        Ok(JwtConfig {
            keys: JwtKeys::Rsa {
                private_key,
                public_key,
            },
            access_token_expiry,
        })
    }
}

/// Accept either inline PEM text or a path to a PEM file
fn read_pem(value: &str) -> Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    let contents = std::fs::read_to_string(value)
        .map_err(|e| anyhow::anyhow!("Failed to read key file {}: {}", value, e))?;
    Ok(contents.trim().to_string())
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: UserId,
    /// Username at the time the token was issued
    pub username: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let (algorithm, encoding_key, decoding_key) = match &config.keys {
            JwtKeys::Secret(secret) => (
                Algorithm::HS256,
                Some(EncodingKey::from_secret(secret.as_bytes())),
                DecodingKey::from_secret(secret.as_bytes()),
            ),
            JwtKeys::Rsa {
                private_key,
                public_key,
            } => {
                let encoding_key = private_key
                    .as_ref()
                    .map(|pem| EncodingKey::from_rsa_pem(pem.as_bytes()))
                    .transpose()?;
                (
                    Algorithm::RS256,
                    encoding_key,
                    DecodingKey::from_rsa_pem(public_key.as_bytes())?,
                )
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;

        Ok(JwtService {
            algorithm,
            encoding_key,
            decoding_key,
            validation,
            access_token_expiry: config.access_token_expiry,
        })
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: UserId, username: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        let encoding_key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("JWT service is configured for verification only"))?;

        let token = encode(&Header::new(self.algorithm), claims, encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.access_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmac_service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            keys: JwtKeys::Secret(secret.to_string()),
            access_token_expiry: 900,
        })
        .unwrap()
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = hmac_service("test-secret");
        let token = service.generate_access_token(UserId(1), "alice").unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, UserId(1));
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = hmac_service("secret-a");
        let verifier = hmac_service("secret-b");

        let token = issuer.generate_access_token(UserId(1), "alice").unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = hmac_service("test-secret");
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Past the default 60 second leeway
        let token = service
            .sign(&Claims {
                sub: UserId(1),
                username: "alice".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = hmac_service("test-secret");
        assert!(service.validate_token("not.a.token").is_err());
    }
}
