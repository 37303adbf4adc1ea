use editorial_common::{AuthorId, PublicationStatus};

/// Which publications a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationFilter {
    #[default]
    All,
    Status(PublicationStatus),
    Author(AuthorId),
}

/// One page of a listing, pages are numbered from zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationQuery {
    pub page: u32,
    pub size: u32,
    pub filter: PublicationFilter,
}

impl PublicationQuery {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    /// Page size is clamped to `1..=MAX_SIZE`.
    pub fn new(page: u32, size: u32, filter: PublicationFilter) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
            filter,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    pub fn matches(&self, status: PublicationStatus, author_id: AuthorId) -> bool {
        match self.filter {
            PublicationFilter::All => true,
            PublicationFilter::Status(wanted) => status == wanted,
            PublicationFilter::Author(wanted) => author_id == wanted,
        }
    }
}

impl Default for PublicationQuery {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE, PublicationFilter::All)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.size.max(1) as u64)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_clamped() {
        assert_eq!(PublicationQuery::new(0, 0, PublicationFilter::All).size, 1);
        assert_eq!(PublicationQuery::new(0, 1000, PublicationFilter::All).size, 100);
        assert_eq!(PublicationQuery::default().size, 10);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PublicationQuery::new(3, 20, PublicationFilter::All).offset(), 60);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page {
            content: vec![],
            page: 0,
            size: 10,
            total_elements: 21,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn filter_matching() {
        let by_status = PublicationQuery::new(
            0,
            10,
            PublicationFilter::Status(PublicationStatus::Approved),
        );
        assert!(by_status.matches(PublicationStatus::Approved, AuthorId(1)));
        assert!(!by_status.matches(PublicationStatus::Draft, AuthorId(1)));

        let by_author = PublicationQuery::new(0, 10, PublicationFilter::Author(AuthorId(4)));
        assert!(by_author.matches(PublicationStatus::Draft, AuthorId(4)));
        assert!(!by_author.matches(PublicationStatus::Draft, AuthorId(5)));
    }
}
