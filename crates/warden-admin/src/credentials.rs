//! Resource server credential generation.

use rand::Rng;

/// Source of resource server keys and secrets.
pub trait CredentialGenerator: Send + Sync {
    fn generate_key(&self) -> String;
    fn generate_secret(&self) -> String;
}

/// Hex tokens drawn from the OS-seeded thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCredentialGenerator;

impl CredentialGenerator for RandomCredentialGenerator {
    /// 32 hex chars = 16 bytes of entropy.
    fn generate_key(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 16] = rng.random();
        hex::encode(bytes)
    }

    /// 64 hex chars = 32 bytes of entropy.
    fn generate_secret(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        hex::encode(bytes)
    }
}
