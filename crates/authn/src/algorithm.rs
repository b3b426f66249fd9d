//! Signing algorithm families.
//!
//! The configured algorithm identifier (`"HS256"`, `"RS256"`, `"EdDSA"`, ...)
//! is resolved exactly once, at configuration time, through
//! [`ALGORITHM_TABLE`]. The resulting [`AlgorithmFamily`] decides which key
//! loader is used; nothing downstream inspects the algorithm name again.
//!
//! # Security
//!
//! - `none` is always rejected
//! - The verifier only accepts tokens whose header algorithm equals the configured one, which
//!   prevents algorithm substitution between families

use std::fmt;

use jsonwebtoken::Algorithm;

use crate::error::SigningError;

/// Algorithms that are never accepted, whatever the configuration says.
pub const FORBIDDEN_ALGORITHMS: &[&str] = &["none", "None", "NONE"];

/// Key family of a signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Symmetric HMAC with a shared secret (`HS256`, `HS384`, `HS512`).
    Hmac,
    /// RSA PKCS#1 v1.5 and PSS (`RS*`, `PS*`), PEM keys.
    Rsa,
    /// ECDSA (`ES256`, `ES384`), PEM keys.
    Ec,
    /// Ed25519 (`EdDSA`), PEM keys.
    EdDsa,
}

impl AlgorithmFamily {
    /// Returns `true` if the family needs separate signing and verifying keys.
    #[must_use]
    pub fn is_asymmetric(&self) -> bool {
        !matches!(self, Self::Hmac)
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hmac => "HMAC",
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::EdDsa => "EdDSA",
        })
    }
}

/// Supported algorithm identifiers and the family each belongs to.
pub const ALGORITHM_TABLE: &[(&str, Algorithm, AlgorithmFamily)] = &[
    ("HS256", Algorithm::HS256, AlgorithmFamily::Hmac),
    ("HS384", Algorithm::HS384, AlgorithmFamily::Hmac),
    ("HS512", Algorithm::HS512, AlgorithmFamily::Hmac),
    ("RS256", Algorithm::RS256, AlgorithmFamily::Rsa),
    ("RS384", Algorithm::RS384, AlgorithmFamily::Rsa),
    ("RS512", Algorithm::RS512, AlgorithmFamily::Rsa),
    ("PS256", Algorithm::PS256, AlgorithmFamily::Rsa),
    ("PS384", Algorithm::PS384, AlgorithmFamily::Rsa),
    ("PS512", Algorithm::PS512, AlgorithmFamily::Rsa),
    ("ES256", Algorithm::ES256, AlgorithmFamily::Ec),
    ("ES384", Algorithm::ES384, AlgorithmFamily::Ec),
    ("EdDSA", Algorithm::EdDSA, AlgorithmFamily::EdDsa),
];

/// Resolves a configured algorithm identifier.
///
/// # Errors
///
/// Returns [`SigningError::UnsupportedAlgorithm`] if the identifier is
/// forbidden or not present in [`ALGORITHM_TABLE`].
///
/// # Examples
///
/// ```
/// use jsonwebtoken::Algorithm;
/// use oauth_channel_authn::algorithm::{AlgorithmFamily, resolve_algorithm};
///
/// let (alg, family) = resolve_algorithm("ES256").unwrap();
/// assert_eq!(alg, Algorithm::ES256);
/// assert_eq!(family, AlgorithmFamily::Ec);
///
/// assert!(resolve_algorithm("none").is_err());
/// ```
pub fn resolve_algorithm(name: &str) -> Result<(Algorithm, AlgorithmFamily), SigningError> {
    if FORBIDDEN_ALGORITHMS.contains(&name) {
        return Err(SigningError::UnsupportedAlgorithm(format!(
            "Algorithm '{}' is not allowed for security reasons",
            name
        )));
    }

    ALGORITHM_TABLE
        .iter()
        .find(|(id, _, _)| *id == name)
        .map(|&(_, algorithm, family)| (algorithm, family))
        .ok_or_else(|| {
            SigningError::UnsupportedAlgorithm(format!(
                "Algorithm '{}' does not belong to a supported family",
                name
            ))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("HS256", AlgorithmFamily::Hmac)]
    #[case("HS512", AlgorithmFamily::Hmac)]
    #[case("RS256", AlgorithmFamily::Rsa)]
    #[case("PS384", AlgorithmFamily::Rsa)]
    #[case("ES256", AlgorithmFamily::Ec)]
    #[case("EdDSA", AlgorithmFamily::EdDsa)]
    fn test_resolve_supported(#[case] name: &str, #[case] family: AlgorithmFamily) {
        let (_, resolved) = resolve_algorithm(name).unwrap();
        assert_eq!(resolved, family);
    }

    #[test]
    fn test_none_rejected_with_security_message() {
        for alg in FORBIDDEN_ALGORITHMS {
            let result = resolve_algorithm(alg);
            assert!(
                matches!(result, Err(SigningError::UnsupportedAlgorithm(ref msg)) if msg.contains("security reasons")),
                "Expected security rejection for '{alg}'"
            );
        }
    }

    #[rstest]
    #[case("ES512")]
    #[case("hs256")]
    #[case("")]
    fn test_unknown_rejected(#[case] name: &str) {
        assert!(matches!(resolve_algorithm(name), Err(SigningError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_table_names_match_jsonwebtoken() {
        for (name, algorithm, _) in ALGORITHM_TABLE {
            assert_eq!(name.parse::<Algorithm>().unwrap(), *algorithm);
        }
    }

    #[test]
    fn test_only_hmac_is_symmetric() {
        assert!(!AlgorithmFamily::Hmac.is_asymmetric());
        assert!(AlgorithmFamily::Rsa.is_asymmetric());
        assert!(AlgorithmFamily::Ec.is_asymmetric());
        assert!(AlgorithmFamily::EdDsa.is_asymmetric());
    }
}
