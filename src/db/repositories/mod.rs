pub mod changelog;
pub mod comments;
pub mod feedback;
pub mod profiles;
pub mod roadmap;
pub mod votes;
pub mod workspaces;

pub use changelog::ChangelogRepo;
pub use comments::CommentRepo;
pub use feedback::FeedbackRepo;
pub use profiles::ProfileRepo;
pub use roadmap::RoadmapRepo;
pub use votes::VoteRepo;
pub use workspaces::WorkspaceRepo;
