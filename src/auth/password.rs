// Password hashing and verification service

use base64::prelude::*;
use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::config::{HashPrf, HashingConfig};

/// Password service for PBKDF2 hashing and constant-time verification
///
/// Every hash is derived with the single salt from the configuration.
/// Two users with the same password therefore store the same hash, and
/// the salt cannot be rotated without invalidating all passwords.
#[derive(Clone)]
pub struct PasswordService {
    prf: HashPrf,
    salt: String,
    iterations: u32,
}

impl PasswordService {
    /// Create a new PasswordService from the hashing configuration
    pub fn new(config: &HashingConfig) -> Self {
        Self {
            prf: config.prf,
            salt: config.salt.clone(),
            iterations: config.iterations,
        }
    }

    /// Hash a password with PBKDF2, returning the base64-encoded digest
    ///
    /// The derived key length matches the PRF digest size: 32 bytes for
    /// SHA-256, 64 bytes for SHA-512. Derivation itself cannot fail.
    pub fn hash_password(&self, password: &str) -> String {
        let digest = match self.prf {
            HashPrf::Sha256 => {
                let mut out = [0u8; 32];
                pbkdf2_hmac::<Sha256>(
                    password.as_bytes(),
                    self.salt.as_bytes(),
                    self.iterations,
                    &mut out,
                );
                out.to_vec()
            }
            HashPrf::Sha512 => {
                let mut out = [0u8; 64];
                pbkdf2_hmac::<Sha512>(
                    password.as_bytes(),
                    self.salt.as_bytes(),
                    self.iterations,
                    &mut out,
                );
                out.to_vec()
            }
        };

        BASE64_STANDARD.encode(digest)
    }

    /// Verify a password against a stored hash in constant time
    ///
    /// The candidate is always derived first, then the encoded forms are
    /// compared without short-circuiting. A malformed stored hash can
    /// never equal a freshly derived one, so it simply fails to verify.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let computed = self.hash_password(password);
        computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service(prf: HashPrf, salt: &str, iterations: u32) -> PasswordService {
        PasswordService::new(&HashingConfig {
            prf,
            salt: salt.to_string(),
            iterations,
        })
    }

    // Published PBKDF2-HMAC-SHA256 vectors for ("password", "salt"),
    // base64-encoded
    #[test]
    fn test_sha256_known_vectors() {
        let one_iteration = service(HashPrf::Sha256, "salt", 1);
        assert_eq!(
            one_iteration.hash_password("password"),
            "Eg+2z/z4syxD5yJSVsT4N6hlSMkszDVICAWYfLcL4Xs="
        );

        let many_iterations = service(HashPrf::Sha256, "salt", 4096);
        assert_eq!(
            many_iterations.hash_password("password"),
            "xeR41ZKIyEGqUw22hFxMjZYok6ABzk4RpJY4c6qYE0o="
        );
    }

    #[test]
    fn test_sha512_known_vector() {
        let service = service(HashPrf::Sha512, "salt", 1);
        assert_eq!(
            service.hash_password("password"),
            "hn9wzxreAs/zdSWZo6U9xK80x6ZpgVrl1RNVThyM8lLALUcKKFoFAbrZmb/pQ8CPBQI119aLHaVeY/c7YKV/zg=="
        );
    }

    #[test]
    fn test_digest_length_matches_prf() {
        let sha256 = service(HashPrf::Sha256, "static-salt", 10);
        let decoded = BASE64_STANDARD.decode(sha256.hash_password("pw")).unwrap();
        assert_eq!(decoded.len(), 32);

        let sha512 = service(HashPrf::Sha512, "static-salt", 10);
        let decoded = BASE64_STANDARD.decode(sha512.hash_password("pw")).unwrap();
        assert_eq!(decoded.len(), 64);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let service = service(HashPrf::Sha256, "static-salt", 1000);
        assert_eq!(
            service.hash_password("pa55word"),
            service.hash_password("pa55word")
        );
        assert_eq!(
            service.hash_password("pa55word"),
            "7OoAXLksZyoovc3xFwy7Wa/DhjqOGeqwbJ2+915LaaQ="
        );
    }

    #[test]
    fn test_hash_differs_across_salts() {
        let first = service(HashPrf::Sha256, "salt-a", 100);
        let second = service(HashPrf::Sha256, "salt-b", 100);
        assert_ne!(
            first.hash_password("password"),
            second.hash_password("password")
        );
    }

    #[test]
    fn test_verify_roundtrip() {
        let service = service(HashPrf::Sha256, "static-salt", 100);
        let hash = service.hash_password("correct horse");

        assert!(service.verify_password("correct horse", &hash));
        assert!(!service.verify_password("battery staple", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_stored_hash() {
        let service = service(HashPrf::Sha256, "static-salt", 100);

        assert!(!service.verify_password("password", "not base64 !!!"));
        assert!(!service.verify_password("password", ""));
    }

    #[test]
    fn test_verify_distinguishes_prf() {
        let sha256 = service(HashPrf::Sha256, "static-salt", 100);
        let sha512 = service(HashPrf::Sha512, "static-salt", 100);

        let hash = sha256.hash_password("password");
        assert!(!sha512.verify_password("password", &hash));
    }

    proptest! {
        #[test]
        fn prop_verify_accepts_own_hash(password in "[ -~]{0,40}") {
            // Low iteration count to keep derivation cheap under proptest
            let service = service(HashPrf::Sha256, "prop-salt", 10);
            let hash = service.hash_password(&password);
            prop_assert!(service.verify_password(&password, &hash));
        }

        #[test]
        fn prop_verify_rejects_other_password(
            password in "[ -~]{1,40}",
            other in "[ -~]{1,40}"
        ) {
            prop_assume!(password != other);

            let service = service(HashPrf::Sha256, "prop-salt", 10);
            let hash = service.hash_password(&password);
            prop_assert!(!service.verify_password(&other, &hash));
        }
    }
}
