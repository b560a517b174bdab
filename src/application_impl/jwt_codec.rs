use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::Claims;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ISSUER: &str = "tokenkeeper";
pub const DEFAULT_AUDIENCE: &str = "tokenkeeper-client";
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub algorithm: Algorithm,
    signing_key: Vec<u8>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("algorithm", &self.algorithm)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    /// Config with default lifetimes, HS256 and the default issuer/audience.
    /// An empty secret is refused.
    pub fn try_new(signing_key: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let signing_key = signing_key.into();
        if signing_key.is_empty() {
            return Err(AuthError::Configuration(
                "signing secret is missing".to_string(),
            ));
        }
        Ok(Self {
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            algorithm: Algorithm::HS256,
            signing_key,
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_ttls(
        mut self,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if access_ttl.is_zero() || refresh_ttl.is_zero() {
            return Err(AuthError::Configuration(
                "token lifetimes must be positive".to_string(),
            ));
        }
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        Ok(self)
    }

    /// Only the HMAC family is accepted; the key is a shared secret.
    pub fn with_algorithm(mut self, name: &str) -> Result<Self, AuthError> {
        let algorithm = name
            .parse::<Algorithm>()
            .map_err(|_| AuthError::Configuration(format!("unknown algorithm: {name}")))?;
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                self.algorithm = algorithm;
                Ok(self)
            }
            other => Err(AuthError::Configuration(format!(
                "algorithm {other:?} is not a MAC algorithm"
            ))),
        }
    }
}

pub struct JwtCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::new(cfg.algorithm);
        validation.leeway = 0;
        // jsonwebtoken rejects only `exp < now`; this makes `exp == now` expired too
        validation.reject_tokens_expiring_in_less_than = 1;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_audience(&[cfg.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);

        JwtCodec {
            algorithm: cfg.algorithm,
            encoding_key: EncodingKey::from_secret(&cfg.signing_key),
            decoding_key: DecodingKey::from_secret(&cfg.signing_key),
            validation,
        }
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            AuthError::SignatureInvalid
        }
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::ImmatureSignature => AuthError::NotYetValid,
        ErrorKind::InvalidIssuer => AuthError::ClaimMismatch { claim: "issuer" },
        ErrorKind::InvalidAudience => AuthError::ClaimMismatch { claim: "audience" },
        ErrorKind::InvalidSubject => AuthError::ClaimMismatch { claim: "subject" },
        _ => AuthError::MalformedToken,
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        if !claims.is_well_formed() {
            return Err(AuthError::Encoding(
                "expires_at must be after issued_at and not_before".to_string(),
            ));
        }
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{Principal, TokenType};
    use chrono::Utc;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-chars!!";

    fn codec() -> (JwtConfig, JwtCodec) {
        let cfg = JwtConfig::try_new(SECRET).unwrap();
        let codec = JwtCodec::new(&cfg);
        (cfg, codec)
    }

    fn claims_for(
        cfg: &JwtConfig,
        issued_at: chrono::DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Claims {
        Claims::new(
            &Principal::new(42, "alice", "user"),
            TokenType::Access,
            &cfg.issuer,
            &cfg.audience,
            issued_at,
            ttl,
        )
    }

    #[test]
    fn encode_then_decode_reproduces_claims() {
        let (cfg, codec) = codec();
        let claims = claims_for(&cfg, Utc::now(), chrono::Duration::minutes(15));
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn missing_secret_is_a_configuration_error() {
        assert!(matches!(
            JwtConfig::try_new(Vec::new()),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn only_mac_algorithms_are_configurable() {
        let cfg = JwtConfig::try_new(SECRET).unwrap();
        assert_eq!(
            cfg.clone().with_algorithm("HS512").unwrap().algorithm,
            Algorithm::HS512
        );
        assert!(matches!(
            cfg.clone().with_algorithm("RS256"),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            cfg.with_algorithm("none"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn zero_ttl_is_refused() {
        let cfg = JwtConfig::try_new(SECRET).unwrap();
        assert!(cfg.with_ttls(Duration::ZERO, DEFAULT_REFRESH_TTL).is_err());
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let cfg = JwtConfig::try_new(SECRET).unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("test-secret"));
    }

    #[test]
    fn empty_and_garbage_input_is_malformed() {
        let (_, codec) = codec();
        assert!(matches!(codec.decode(""), Err(AuthError::MalformedToken)));
        assert!(matches!(codec.decode("not-a-token"), Err(AuthError::MalformedToken)));
        assert!(matches!(codec.decode("a.b.c"), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn foreign_secret_fails_signature() {
        let (cfg, codec) = codec();
        let other = JwtCodec::new(&JwtConfig::try_new(b"another-secret".to_vec()).unwrap());
        let token = other
            .encode(&claims_for(&cfg, Utc::now(), chrono::Duration::minutes(5)))
            .unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn tampered_payload_fails_signature() {
        let (cfg, codec) = codec();
        let token = codec
            .encode(&claims_for(&cfg, Utc::now(), chrono::Duration::minutes(5)))
            .unwrap();
        let forged_claims = Claims {
            role: "admin".to_string(),
            ..claims_for(&cfg, Utc::now(), chrono::Duration::minutes(5))
        };
        let forged_payload = codec.encode(&forged_claims).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert!(matches!(codec.decode(&spliced), Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn algorithm_substitution_is_rejected() {
        let (cfg, codec) = codec();
        let claims = claims_for(&cfg, Utc::now(), chrono::Duration::minutes(5));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn expired_token_is_rejected_without_leeway() {
        let (cfg, codec) = codec();
        let claims = claims_for(
            &cfg,
            Utc::now() - chrono::Duration::minutes(20),
            chrono::Duration::minutes(15),
        );
        let token = codec.encode(&claims).unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::Expired)));

        // one second past expiry is enough with zero leeway
        let claims = claims_for(
            &cfg,
            Utc::now() - chrono::Duration::seconds(62),
            chrono::Duration::seconds(60),
        );
        let token = codec.encode(&claims).unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn token_is_expired_in_its_expiry_second() {
        let (cfg, codec) = codec();
        // exp == now, or already past it if the clock ticks before decoding
        let claims = claims_for(
            &cfg,
            Utc::now() - chrono::Duration::seconds(60),
            chrono::Duration::seconds(60),
        );
        let token = codec.encode(&claims).unwrap();
        assert!(claims.expires_at <= Utc::now().timestamp());
        assert!(matches!(codec.decode(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn future_not_before_is_rejected() {
        let (cfg, codec) = codec();
        let mut claims = claims_for(&cfg, Utc::now(), chrono::Duration::minutes(15));
        claims.not_before += 300;
        let token = codec.encode(&claims).unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::NotYetValid)));
    }

    #[test]
    fn issuer_and_audience_must_match() {
        let (cfg, codec) = codec();
        let mut claims = claims_for(&cfg, Utc::now(), chrono::Duration::minutes(15));
        claims.issuer = "someone-else".to_string();
        let token = codec.encode(&claims).unwrap();
        assert!(matches!(
            codec.decode(&token),
            Err(AuthError::ClaimMismatch { claim: "issuer" })
        ));

        let mut claims = claims_for(&cfg, Utc::now(), chrono::Duration::minutes(15));
        claims.audience = "other-client".to_string();
        let token = codec.encode(&claims).unwrap();
        assert!(matches!(
            codec.decode(&token),
            Err(AuthError::ClaimMismatch { claim: "audience" })
        ));
    }

    #[test]
    fn ill_formed_claims_are_not_signed() {
        let (cfg, codec) = codec();
        let mut claims = claims_for(&cfg, Utc::now(), chrono::Duration::minutes(15));
        claims.expires_at = claims.issued_at;
        assert!(matches!(codec.encode(&claims), Err(AuthError::Encoding(_))));
    }
}
