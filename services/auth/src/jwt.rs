//! JWT service for token generation and validation
//!
//! Tokens are signed with RS256. The API service verifies them with the
//! matching public key through `common::token::TokenVerifier`.

use anyhow::Result;
use common::token::{Claims, TokenError, TokenType, TokenVerifier, read_pem, unix_now};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, encode};
use uuid::Uuid;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Private key for signing tokens
    pub private_key: String,
    /// Public key for verifying tokens
    pub public_key: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PRIVATE_KEY`: Private key (PEM format) or path to a PEM file
    /// - `JWT_PUBLIC_KEY`: Public key (PEM format) or path to a PEM file
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let private_key = read_pem("JWT_PRIVATE_KEY")?;
        let public_key = read_pem("JWT_PUBLIC_KEY")?;

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604800);

        Ok(JwtConfig {
            private_key,
            public_key,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    verifier: TokenVerifier,
    access_token_expiry: u64,
    refresh_token_expiry: u64,
}

impl JwtService {
    /// Initialize a new RS256 JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key.as_bytes())?;

        Ok(Self::with_keys(
            encoding_key,
            decoding_key,
            Algorithm::RS256,
            config.access_token_expiry,
            config.refresh_token_expiry,
        ))
    }

    pub fn with_keys(
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        access_token_expiry: u64,
        refresh_token_expiry: u64,
    ) -> Self {
        Self {
            encoding_key,
            algorithm,
            verifier: TokenVerifier::new(decoding_key, algorithm),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    fn generate(&self, user_id: Uuid, token_type: TokenType, ttl: u64) -> Result<String> {
        let now = unix_now();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + ttl,
            token_type,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenType::Access, self.access_token_expiry)
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenType::Refresh, self.refresh_token_expiry)
    }

    /// Validate a refresh token and return its claims
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verifier.verify_kind(token, TokenType::Refresh)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.access_token_expiry
    }
}
