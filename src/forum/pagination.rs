//! Page-number pagination for forum listings.
//!
//! A requested page that is missing or not an integer resolves to the first
//! page. A page outside `1..=num_pages` resolves to the last page. Listing
//! an empty collection still yields one empty page.

/// Splits a collection of `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u32,
    total: i64,
}

impl Paginator {
    /// Create a paginator. A zero page size is treated as one.
    pub fn new(per_page: u32, total: i64) -> Self {
        Self {
            per_page: per_page.max(1),
            total: total.max(0),
        }
    }

    /// Items per page.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total number of items.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Number of pages, never less than one.
    pub fn num_pages(&self) -> u32 {
        let per_page = i64::from(self.per_page);
        let pages = (self.total + per_page - 1) / per_page;
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }

    /// Resolve a raw `page` query value to a valid page number.
    ///
    /// # Examples
    ///
    /// ```
    /// use agora::forum::Paginator;
    ///
    /// let paginator = Paginator::new(20, 45);
    /// assert_eq!(paginator.resolve(None), 1);
    /// assert_eq!(paginator.resolve(Some("abc")), 1);
    /// assert_eq!(paginator.resolve(Some("2")), 2);
    /// assert_eq!(paginator.resolve(Some("99")), 3);
    /// ```
    pub fn resolve(&self, raw: Option<&str>) -> u32 {
        let Some(requested) = raw.and_then(|s| s.trim().parse::<i64>().ok()) else {
            return 1;
        };

        let num_pages = self.num_pages();
        if requested < 1 || requested > i64::from(num_pages) {
            num_pages
        } else {
            requested as u32
        }
    }

    /// Offset of the first item on `page`.
    pub fn offset(&self, page: u32) -> i64 {
        i64::from(page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Limit to use when fetching one page.
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Wrap the items fetched for `number` into a [`Page`].
    pub fn page<T>(&self, number: u32, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            per_page: self.per_page,
            total: self.total,
            num_pages: self.num_pages(),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// One-based page number.
    pub number: u32,
    /// Page size.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: i64,
    /// Number of pages.
    pub num_pages: u32,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}
