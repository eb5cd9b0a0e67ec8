//! Explicit mode-chaining state, threaded by value between chunk calls
//! rather than stored on the context.

/// Carried state for a chained mode. The meaning of `initial` depends on
/// the mode: IV for CBC/PCBC, shift register for CFB, feedback for OFB,
/// counter base for CTR, random seed for RandomDelta. ECB carries none.
#[derive(Clone)]
pub struct ModeState {
    pub initial: Vec<u8>,
    /// RandomDelta's half-block increment, fixed for the life of a stream.
    pub delta: Option<Vec<u8>>,
}

impl ModeState {
    pub fn new(initial: Vec<u8>) -> Self {
        Self {
            initial,
            delta: None,
        }
    }

    pub fn with_delta(initial: Vec<u8>, delta: Vec<u8>) -> Self {
        Self {
            initial,
            delta: Some(delta),
        }
    }
}
