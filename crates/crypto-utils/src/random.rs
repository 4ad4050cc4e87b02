use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use rand_core::OsRng;

/// Alphabet of generated link passwords. Only URL-safe characters, so a
/// password never needs escaping inside a link fragment.
pub const PASSWORD_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates `len` cryptographically secure random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Generates a link password of `len` characters drawn uniformly from
/// [`PASSWORD_CHARSET`].
pub fn random_password(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
