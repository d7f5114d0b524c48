pub mod filter;
pub mod model;
pub mod repo;

pub use model::*;
pub use repo::RecommendationService;
