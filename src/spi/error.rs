use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpiError {
    #[error("Only {found} valid observations, at least {required} are needed for a gamma fit")]
    InsufficientSample { found: usize, required: usize },

    #[error("Gamma fit is degenerate: {0}")]
    DegenerateFit(String),

    #[error("Accumulation scale must be a positive number of months, got {0}")]
    InvalidScale(usize),
}
