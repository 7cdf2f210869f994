pub mod feeds;
pub mod model;
pub mod repository;

pub use model::{
    AnalyticsStats, BlogError, Category, DashboardStats, Post, PostForm, PostId, PostInput,
    PostStatus, PostSummary, Tag,
};
pub use repository::BlogRepository;
