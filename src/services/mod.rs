pub mod reviews;
pub mod wishlist;

pub use reviews::{
    with_review_stats, NewReview, ReviewService, ReviewSort, ReviewSummary, ReviewUpdate,
};
pub use wishlist::WishlistService;
