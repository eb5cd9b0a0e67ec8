//! Pedagogical block-cipher, mode-of-operation and RSA primitives.
//!
//! The hard core is [`context::CipherContext`]: a block cipher plus a mode
//! of operation plus a padding scheme, driving in-memory buffers and
//! streamed files through the same single-chunk engine. Concrete ciphers
//! (`ciphers::*`) are generalized capability implementations (`BlockCipher`,
//! `KeyExpander`, `RoundFunction`) rather than a single inheritance
//! hierarchy; RSA and Diffie-Hellman are separate collaborators built on
//! `num-bigint-dig`.

pub mod bits;
pub mod cipher;
pub mod ciphers;
pub mod context;
pub mod dh;
pub mod error;
pub mod feistel;
pub mod gf256;
pub mod hex_encoding;
pub mod mode;
pub mod padding;
pub mod rsa;
pub mod wiener;

pub use cipher::BlockCipher;
pub use context::CipherContext;
pub use error::Error;
pub use mode::EncryptionMode;
pub use padding::PaddingScheme;

pub use ciphers::{Deal, Des, Frog, Rc4, Rijndael, TripleDes};
