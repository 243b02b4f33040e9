use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

fn inspect_validation() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}

/// Read the `exp` claim of an access token.
///
/// The signature is not checked; the backend remains the authority on
/// validity. Returns `None` for opaque or malformed tokens.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &inspect_validation())
        .ok()?;
    data.claims
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    #[test]
    fn test_reads_expiry_without_secret() {
        let exp = Utc::now().timestamp() + 900;
        let token = encode(
            &Header::default(),
            &Claims {
                sub: "admin-1".into(),
                exp,
            },
            &EncodingKey::from_secret(b"backend-only-secret"),
        )
        .unwrap();

        let expiry = token_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), exp);
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        assert!(token_expiry("not-a-jwt").is_none());
    }
}
