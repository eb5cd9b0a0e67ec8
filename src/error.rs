use thiserror::Error;

/// Errors returned by the cipher context, the concrete ciphers, and the
/// RSA/Diffie-Hellman collaborators.
#[derive(Error, Debug)]
pub enum Error {
    #[error("[cryptolab] invalid argument: {0}")]
    InvalidArgument(String),

    #[error("[cryptolab] invalid data: {0}")]
    InvalidData(String),

    #[error("[cryptolab] input shorter than one block")]
    InputTooShort,

    #[error("[cryptolab] operation attempted after context disposal")]
    UseAfterClose,

    #[error("[cryptolab] cipher not initialized")]
    NotInitialized,

    #[error("[cryptolab] i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[cryptolab] unable to parse hex string: {0}")]
    ParseHex(#[from] hex::FromHexError),

    #[error("[cryptolab] rsa error: {0}")]
    Rsa(String),
}

/// Bail out early with an [`Error`] when a condition holds.
#[macro_export]
macro_rules! bail {
    ($expression:expr, $err:expr) => {
        if $expression {
            return Err($err);
        }
    };
    ( $( $cond:expr , $err:expr ),+ $(,)? ) => {
        $(
            if $cond {
                return Err($err);
            }
        )+
    };
}
