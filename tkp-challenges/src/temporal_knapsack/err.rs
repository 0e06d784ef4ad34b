/// Structural problems found while building a [`super::Challenge`] from raw
/// instance data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedInstanceError {
    /// One of the two header lines (bid count, capacity) is absent.
    MissingHeader(&'static str),
    InvalidInteger {
        line: usize,
        token: String,
    },
    /// A bid row with fewer than four fields, `line` is 1-indexed.
    ShortRow {
        line: usize,
        fields: usize,
    },
    BidCountMismatch {
        expected: usize,
        found: usize,
    },
    /// Times are 1-indexed, so a start of 0 cannot be expressed.
    ZeroStart {
        bid: usize,
    },
    InvertedInterval {
        bid: usize,
        start: u32,
        finish: u32,
    },
}

impl std::fmt::Display for MalformedInstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedInstanceError::MissingHeader(field) => {
                write!(f, "Missing header line: {}", field)
            }
            MalformedInstanceError::InvalidInteger { line, token } => {
                write!(f, "Line {}: '{}' is not a non-negative integer", line, token)
            }
            MalformedInstanceError::ShortRow { line, fields } => write!(
                f,
                "Line {}: {} fields, expected price demand start finish",
                line, fields
            ),
            MalformedInstanceError::BidCountMismatch { expected, found } => write!(
                f,
                "Instance declares {} bids but {} rows were supplied",
                expected, found
            ),
            MalformedInstanceError::ZeroStart { bid } => {
                write!(f, "Bid {} starts at time 0, times are 1-indexed", bid)
            }
            MalformedInstanceError::InvertedInterval { bid, start, finish } => write!(
                f,
                "Bid {} starts at {} after it finishes at {}",
                bid, start, finish
            ),
        }
    }
}

impl std::error::Error for MalformedInstanceError {}
