use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

/// Symbols a random string is drawn from. The length is a power of two so a
/// random byte reduced modulo the length stays uniform.
pub const RANDOM_STRING_SOURCE: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_+";

#[derive(Error, Debug)]
pub enum RandomError {
    #[error("entropy source failed: {0}")]
    Entropy(#[from] rand::Error),
}

/// Returns `length` characters sampled independently from
/// [`RANDOM_STRING_SOURCE`] using the operating system's CSPRNG.
pub fn random_string(length: usize) -> Result<String, RandomError> {
    let mut bytes = vec![0u8; length];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(bytes
        .iter()
        .map(|b| char::from(RANDOM_STRING_SOURCE[usize::from(*b) % RANDOM_STRING_SOURCE.len()]))
        .collect())
}
