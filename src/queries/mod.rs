//! Stateful query controllers that sit between a UI and the content client.
//!
//! Each controller owns its loading/error/data state behind an async mutex and
//! is meant to be shared through an `Arc`. Read failures never reach callers
//! as errors: the controller answers from the [`FallbackStore`] instead and
//! keeps the failure message for display. Every fetch is tagged with a
//! generation number; a result whose generation is no longer current is
//! dropped so that an older, slower request cannot overwrite a newer one.
//!
//! [`FallbackStore`]: crate::fallback::FallbackStore

pub mod article;
pub mod articles;
pub mod categories;
pub mod forms;

pub use article::{ArticleDetail, ArticleLookup};
pub use articles::{ArticleFeed, FeedData, LoadMore};
pub use categories::CategoryList;
pub use forms::{ContactForm, NewsletterSignup, SubmissionState};

use serde::Serialize;

/// Which side answered the last committed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Point-in-time view of a query for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySnapshot<T> {
    pub data: T,
    pub phase: Phase,
    /// Message of the failure that forced a fallback, if any.
    pub error: Option<String>,
    pub source: DataSource,
}

impl<T> QuerySnapshot<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Ready, but served from bundled content.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.phase == Phase::Ready && self.source == DataSource::Fallback
    }
}

/// Outcome of one fetch after the fallback decision.
pub(crate) struct Resolved<T> {
    pub data: T,
    pub source: DataSource,
    pub error: Option<String>,
}

impl<T> Resolved<T> {
    pub(crate) const fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
            error: None,
        }
    }

    pub(crate) const fn fallback(data: T, error: String) -> Self {
        Self {
            data,
            source: DataSource::Fallback,
            error: Some(error),
        }
    }
}

/// Snapshot plus the generation counter that guards it.
#[derive(Debug)]
pub(crate) struct QueryCell<T> {
    snapshot: QuerySnapshot<T>,
    generation: u64,
}

impl<T: Clone + Default> Default for QueryCell<T> {
    fn default() -> Self {
        Self {
            snapshot: QuerySnapshot {
                data: T::default(),
                phase: Phase::Idle,
                error: None,
                source: DataSource::Live,
            },
            generation: 0,
        }
    }
}

impl<T: Clone> QueryCell<T> {
    /// Starts a request that supersedes any request still in flight.
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.snapshot.phase = Phase::Loading;
        self.snapshot.error = None;
        self.generation
    }

    /// Starts a request that extends the current data instead of replacing
    /// it. Shares the current generation.
    pub(crate) fn begin_extend(&mut self) -> u64 {
        self.snapshot.phase = Phase::Loading;
        self.generation
    }

    pub(crate) const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.snapshot.is_loading()
    }

    pub(crate) const fn data(&self) -> &T {
        &self.snapshot.data
    }

    /// Applies a finished request if it is still current. Returns whether it
    /// was applied.
    pub(crate) fn commit<R>(
        &mut self,
        generation: u64,
        resolved: Resolved<R>,
        apply: impl FnOnce(&mut T, R),
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        apply(&mut self.snapshot.data, resolved.data);
        if resolved.source == DataSource::Fallback {
            self.snapshot.source = DataSource::Fallback;
            self.snapshot.error = resolved.error;
        }
        self.snapshot.phase = Phase::Ready;
        true
    }

    /// Like [`Self::commit`], but also resets the source to whatever answered
    /// this request.
    pub(crate) fn commit_replace<R>(
        &mut self,
        generation: u64,
        resolved: Resolved<R>,
        apply: impl FnOnce(&mut T, R),
    ) -> bool {
        if self.is_current(generation) {
            self.snapshot.source = resolved.source;
        }
        self.commit(generation, resolved, apply)
    }

    pub(crate) fn snapshot(&self) -> QuerySnapshot<T> {
        self.snapshot.clone()
    }
}
