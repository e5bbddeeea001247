pub mod priority;

pub use priority::priority_score;
