pub mod article;
pub mod category;
pub mod submission;

pub use article::{Article, ArticleFilter, ArticlePage, ReadTime};
pub use category::{Category, eq_ignore_case};
pub use submission::{ContactMessage, SubmissionReceipt};
