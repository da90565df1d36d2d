use crate::record::ResultRecord;

/// Pages fetched so far, indexed from zero.
///
/// [`PageCache::push`] is the only way to add a page, so indices are always
/// contiguous. Pages are never evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCache {
    pages: Vec<Vec<ResultRecord>>,
}

impl PageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `page` and returns its index.
    pub fn push(&mut self, page: Vec<ResultRecord>) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[ResultRecord]> {
        self.pages.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index < self.pages.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.pages.len().checked_sub(1)
    }

    /// Number of records in each cached page, in index order.
    #[must_use]
    pub fn page_sizes(&self) -> Vec<usize> {
        self.pages.iter().map(Vec::len).collect()
    }
}
