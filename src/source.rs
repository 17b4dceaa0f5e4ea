//! The seam between the query controllers and whatever serves content.

use std::sync::Arc;

use crate::error::ContentError;
use crate::models::{Article, ArticleFilter, ArticlePage, Category, SubmissionReceipt};

/// Remote content operations.
///
/// Implemented by [`crate::clients::wordpress::WordPressClient`]; tests plug
/// in scripted sources. Read results are shared so that cached answers can be
/// handed out without copying.
///
/// # Examples
///
/// ```rust,ignore
/// use hubfeed::source::ContentSource;
/// use hubfeed::models::ArticleFilter;
/// use std::sync::Arc;
///
/// async fn example(source: Arc<dyn ContentSource>) -> Result<(), hubfeed::ContentError> {
///     let page = source.list_articles(&ArticleFilter::default().with_featured(true)).await?;
///     println!("{} featured articles", page.items.len());
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists one page of articles.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::Fetch`] on transport or HTTP failures
    /// - Returns [`ContentError::CategoryNotFound`] for an unknown category slug
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Arc<ArticlePage>, ContentError>;

    /// Looks up a single article by slug.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::NotFound`] when no post has this slug
    /// - Returns [`ContentError::Fetch`] on transport or HTTP failures
    async fn get_article_by_slug(&self, slug: &str) -> Result<Arc<Article>, ContentError>;

    /// Lists all categories, up to the API's single-page bound.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Fetch`] on transport or HTTP failures.
    async fn list_categories(&self) -> Result<Arc<Vec<Category>>, ContentError>;

    /// Signs an address up for the newsletter.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::Validation`] for a malformed address
    /// - Returns [`ContentError::Subscription`] when the server refuses
    async fn subscribe(&self, email: &str) -> Result<SubmissionReceipt, ContentError>;

    /// Sends a contact form message.
    ///
    /// # Errors
    ///
    /// - Returns [`ContentError::Validation`] for blank or malformed fields
    /// - Returns [`ContentError::Submission`] when the server refuses
    async fn submit_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<SubmissionReceipt, ContentError>;
}
