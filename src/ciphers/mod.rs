//! Concrete block- and stream-cipher implementations.

pub mod deal;
pub mod des;
pub mod frog;
pub mod rc4;
pub mod rijndael;
pub mod triple_des;

pub use deal::Deal;
pub use des::Des;
pub use frog::Frog;
pub use rc4::Rc4;
pub use rijndael::Rijndael;
pub use triple_des::TripleDes;
