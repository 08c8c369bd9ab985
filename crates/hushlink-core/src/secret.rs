//! Ephemeral secret generation.

use hushlink_crypto::{ADDRESS_SIZE, EphemeralSecret};

use crate::env::Environment;

/// Generate a fresh, uniformly random address-shaped secret.
///
/// Stateless; one draw per message. Collision probability across draws is
/// cryptographically negligible (2^-160) and not handled as an error case.
pub fn generate_secret(env: &impl Environment) -> EphemeralSecret {
    let mut entropy = [0u8; ADDRESS_SIZE];
    env.random_bytes(&mut entropy);
    EphemeralSecret::from_entropy(entropy)
}
