use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried in the bearer token. `sub` is the user id as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub exp: i64,
}

/// Sign `claims` with the HS256 default header.
pub fn generate_token<K: AsRef<[u8]>>(
    claims: UserClaims,
    key: K,
) -> jsonwebtoken::errors::Result<String> {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key.as_ref()),
    )
}

/// Verify signature and expiry, returning the decoded claims.
pub fn process_token<K: AsRef<[u8]>>(
    token: &str,
    key: K,
) -> jsonwebtoken::errors::Result<TokenData<UserClaims>> {
    jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(key.as_ref()),
        &Validation::default(),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let claims = UserClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };
        let token = generate_token(claims.clone(), "secret").unwrap();
        let decoded = process_token(&token, "secret").unwrap();
        assert_eq!(decoded.claims.sub, claims.sub);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = UserClaims {
            sub: "x".into(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };
        let token = generate_token(claims, "secret").unwrap();
        assert!(process_token(&token, "other").is_err());
    }
}
