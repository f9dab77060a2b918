//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod comment_repo;
pub mod follow_repo;
pub mod model_repo;
pub mod prompt_repo;
pub mod rating_repo;
pub mod saved_prompt_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use follow_repo::FollowRepo;
pub use model_repo::ModelRepo;
pub use prompt_repo::PromptRepo;
pub use rating_repo::RatingRepo;
pub use saved_prompt_repo::SavedPromptRepo;
pub use user_repo::UserRepo;
