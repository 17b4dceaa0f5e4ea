pub const SITE_NAME: &str = "DataEngineer Hub";

pub const DEFAULT_BASE_URL: &str = "https://dataengineerhub.blog";

/// Path of the WordPress REST namespace below the site root.
pub const API_NAMESPACE: &str = "wp-json/wp/v2";

pub mod content {

    pub const PLACEHOLDER_IMAGE: &str =
        "https://images.unsplash.com/photo-1595872018818-97555653a011";

    pub const UNCATEGORIZED: &str = "Uncategorized";

    pub const WORDS_PER_MINUTE: u32 = 200;
}

pub mod cache {

    pub const TTL_SECONDS: u64 = 5 * 60;
}

pub mod limits {

    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Upper bound for the single categories request.
    pub const MAX_CATEGORIES: u32 = 100;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

pub mod intervals {
    use std::time::Duration;

    /// Pause before a "load more" fetch so the UI can show its spinner.
    pub const LOAD_MORE_DELAY: Duration = Duration::from_millis(500);
}
