use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Keyed digest for stored passwords. The secret comes from config so a
/// leaked database alone is not enough to forge a login.
pub fn password_digest(secret: &str, password: &str) -> String {
    let mut mac =
        Hmac::<Sha1>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    let result = mac.finalize().into_bytes();
    base64::engine::general_purpose::STANDARD.encode(result)
}

pub fn verify_password(secret: &str, password: &str, digest: &str) -> bool {
    password_digest(secret, password) == digest
}
