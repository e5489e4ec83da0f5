//! Error type for the DMFT library

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmftError {
    /// Two frequency-indexed sequences disagree in length.
    #[error("{what} has length {found}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A complex denominator vanished exactly.
    #[error("singular denominator while computing {quantity} at frequency index {index}")]
    SingularDenominator { quantity: &'static str, index: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, DmftError>;

/// Fail with `LengthMismatch` unless `found == expected`.
pub(crate) fn check_length(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(DmftError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

/// `1/z`, failing with `SingularDenominator` when `z` is exactly zero.
pub(crate) fn checked_inv(
    z: num_complex::Complex64,
    quantity: &'static str,
    index: usize,
) -> Result<num_complex::Complex64> {
    if z.re == 0.0 && z.im == 0.0 {
        Err(DmftError::SingularDenominator { quantity, index })
    } else {
        Ok(z.inv())
    }
}
