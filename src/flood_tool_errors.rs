use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloodToolError {
    #[error("Batch length mismatch: {left} elements paired with {right}")]
    BatchLengthMismatch { left: usize, right: usize },

    #[error("Unknown probability band label: {0}")]
    UnknownProbabilityBand(String),

    #[error("Risk zone radius must be non-negative, got {0}")]
    NegativeRadius(f64),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV reading or writing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Data file not found at: {0}")]
    DataFileNotFound(String),
}

impl PartialEq for FloodToolError {
    fn eq(&self, other: &Self) -> bool {
        use FloodToolError::*;
        match (self, other) {
            (
                BatchLengthMismatch {
                    left: a1,
                    right: b1,
                },
                BatchLengthMismatch {
                    left: a2,
                    right: b2,
                },
            ) => a1 == a2 && b1 == b2,
            (UnknownProbabilityBand(a), UnknownProbabilityBand(b)) => a == b,
            (NegativeRadius(a), NegativeRadius(b)) => a == b,
            (DataFileNotFound(a), DataFileNotFound(b)) => a == b,

            // not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}

/// Check that two paired batches have the same length.
///
/// Paired inputs (eastings with northings, postcodes with bands, ...) are never truncated to the
/// shorter side; a mismatch is reported to the caller instead.
pub(crate) fn check_batch_lengths(left: usize, right: usize) -> Result<(), FloodToolError> {
    if left != right {
        tracing::warn!(left, right, "rejecting batch with mismatched input lengths");
        return Err(FloodToolError::BatchLengthMismatch { left, right });
    }
    Ok(())
}
