//! Confidentiality modes of operation.

/// Block-cipher mode of operation. ECB/CTR/RandomDelta-encrypt-with-known-state
/// are parallelizable; the rest chain block-to-block and run sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionMode {
    Ecb,
    Cbc,
    Pcbc,
    Cfb,
    Ofb,
    Ctr,
    RandomDelta,
}

impl EncryptionMode {
    /// Whether this mode requires a caller-supplied IV (CTR and RandomDelta
    /// instead derive their starting state from an internally carried
    /// nonce / random seed, see `context`).
    pub fn needs_iv(self) -> bool {
        !matches!(self, EncryptionMode::Ctr | EncryptionMode::RandomDelta)
    }

    /// Whether this mode is safe to dispatch across worker threads once its
    /// starting state (counter base / IV) is known.
    pub fn parallelizable(self) -> bool {
        matches!(self, EncryptionMode::Ecb | EncryptionMode::Ctr)
    }

    /// Whether this mode prepends an extra encrypted block to the output
    /// (CTR: `E(nonce)`; RandomDelta: `E(random_data)`).
    pub fn has_prefix_block(self) -> bool {
        matches!(self, EncryptionMode::Ctr | EncryptionMode::RandomDelta)
    }
}
