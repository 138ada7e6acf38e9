use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChirpError>;

/// Reasons a set of radar requirements cannot be turned into chirp parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChirpError {
    /// Input is NaN, infinite, zero or negative
    #[error("invalid input {name} = {value}: must be finite and positive")]
    InvalidInput { name: &'static str, value: f64 },

    /// A derived quantity would be zero or overflow
    #[error("degenerate input: {0} is zero or not finite")]
    DegenerateInput(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ChirpError::InvalidInput {
            name: "range_res",
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid input range_res = -1: must be finite and positive"
        );
        assert_eq!(
            ChirpError::DegenerateInput("wavelength").to_string(),
            "degenerate input: wavelength is zero or not finite"
        );
    }
}
