pub mod api;
pub mod changelog;
pub mod comment;
pub mod feedback;
pub mod profile;
pub mod roadmap;
pub mod stats;
pub mod vote;
pub mod workspace;

pub use api::*;
pub use changelog::*;
pub use comment::*;
pub use feedback::*;
pub use profile::*;
pub use roadmap::*;
pub use stats::*;
pub use vote::*;
pub use workspace::*;
