pub mod candidates;
pub mod pool;
pub mod providers;
pub mod ranker;
pub mod recommendations;
pub mod similarity;
pub mod sorter;
pub mod throttle;

pub use candidates::{fetch_candidates, SeedPlan};
pub use pool::build_pool;
pub use ranker::{rank, RankingConfig};
pub use similarity::similarity;
pub use sorter::resort;
