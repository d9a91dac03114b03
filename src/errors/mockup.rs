//! Errors raised when a value crosses the typed boundary of the engine.

use thiserror::Error;

/// Invalid keys and values handed to the engine by a caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockupError {
    /// Print-area key outside the fixed set of eight
    #[error("Unknown print area: {0}")]
    UnknownPrintArea(String),

    /// Layer key that is neither a base layer, a patch nor a border
    #[error("Unknown layer key: {0}")]
    UnknownLayer(String),

    /// Side other than front or back
    #[error("Unknown side: {0}")]
    UnknownSide(String),

    /// Box field other than left, top, width or height
    #[error("Unknown box field: {0}")]
    UnknownBoxField(String),

    /// Percentage string that does not parse as a number
    #[error("Invalid percentage value: {0}")]
    InvalidPercentage(String),

    /// Lining weight other than 0, 2 or 4 oz
    #[error("Invalid lining weight: {0} (expected 0, 2 or 4)")]
    InvalidLiningWeight(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = MockupError::UnknownPrintArea("front_middle".to_string());
        assert_eq!(err.to_string(), "Unknown print area: front_middle");
    }
}
