use thiserror::Error;

/// Errors raised by the wishlist, review, comparison and booking services
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("review comment must be 10-1000 characters, got {0}")]
    CommentLength(usize),

    #[error("review title must be at most 100 characters, got {0}")]
    TitleTooLong(usize),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("select at least 2 properties to compare, got {0}")]
    TooFewToCompare(usize),

    #[error("at most 4 properties can be compared, got {0}")]
    TooManyToCompare(usize),

    #[error("property {0} appears more than once in the comparison")]
    DuplicateInComparison(String),

    #[error("check-out must be at least one night after check-in")]
    InvalidStay,

    #[error("{requested} guests requested but the property sleeps {capacity}")]
    TooManyGuests { requested: u32, capacity: u32 },

    #[error("at least one guest is required")]
    NoGuests,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
