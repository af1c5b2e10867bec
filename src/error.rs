use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the codec itself. Each one is local to a single call and
/// never retried.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("cannot build a code from an empty input")]
    EmptyInput,

    #[error("symbol {symbol} at position {position} has no code in the table")]
    IncompleteCodeTable { symbol: String, position: usize },

    #[error("corrupt bitstream at bit {bit_offset}: {reason}")]
    CorruptBitstream {
        bit_offset: usize,
        reason: &'static str,
    },

    #[error("invalid code table: {reason}")]
    InvalidCodeTable { reason: String },

    #[error("symbol counts add up to more than {}", usize::MAX)]
    CountOverflow,
}

impl CodecError {
    /// True when the failure comes from the bitstream rather than from how
    /// the codec was called.
    pub fn is_bad_data(&self) -> bool {
        matches!(self, CodecError::CorruptBitstream { .. })
    }

    pub(crate) fn corrupt(bit_offset: usize, reason: &'static str) -> Self {
        CodecError::CorruptBitstream { bit_offset, reason }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Configuration file not found at \"{:?}\"", .config_file_path.as_path())]
    MissingConfigurationFile {
        config_file_path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration file")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("Generic I/O error")]
    IoError(#[from] io::Error),

    #[error("decoded output differs from the input at byte {position}")]
    RoundTripMismatch { position: usize },
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_corruption_is_bad_data() {
        assert!(CodecError::corrupt(3, "truncated code").is_bad_data());
        assert!(!CodecError::EmptyInput.is_bad_data());
        assert!(!CodecError::IncompleteCodeTable {
            symbol: "b'x'".into(),
            position: 0
        }
        .is_bad_data());
    }

    #[test]
    fn messages_name_the_location() {
        let err = CodecError::corrupt(17, "bits end in the middle of a code");
        assert_eq!(
            err.to_string(),
            "corrupt bitstream at bit 17: bits end in the middle of a code"
        );
    }
}
