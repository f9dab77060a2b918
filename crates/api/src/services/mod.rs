//! Service layer: composes repositories and core helpers into the
//! JSON-serializable view structs the handlers return.
//!
//! Services are zero-sized structs whose async methods take `&PgPool`
//! explicitly, mirroring the repository layer. View assembly (rating
//! aggregation, tag parsing, image fallback, per-viewer flags) lives here so
//! handlers stay thin and repositories stay ORM-shaped.

pub mod catalog_service;
pub mod comment_service;
pub mod follow_service;
pub mod image_store;
pub mod prompt_service;
pub mod rating_service;
pub mod save_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use comment_service::CommentService;
pub use follow_service::FollowService;
pub use image_store::ImageStore;
pub use prompt_service::PromptService;
pub use rating_service::RatingService;
pub use save_service::SaveService;
pub use user_service::UserService;
