pub struct Page<T> {
    items: Vec<T>,
    chunk_size: usize,
    index: usize,
}

impl<T> Page<T> {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            items: Vec::new(),
            chunk_size: chunk_size.max(1),
            index: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn page_count(&self) -> usize {
        let len = self.items.len();
        (len / self.chunk_size + usize::from(len % self.chunk_size != 0)).max(1)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves to a zero-based page, clamped to the last page.
    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.page_count() - 1);
    }

    pub fn has_previous(&self) -> bool {
        self.index != 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.page_count()
    }

    pub fn items(&self) -> &[T] {
        let start = self
            .index
            .saturating_mul(self.chunk_size)
            .min(self.items.len());
        let end = start.saturating_add(self.chunk_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn label(&self) -> String {
        format!("Page {}/{}", self.index + 1, self.page_count())
    }
}

impl<T> Extend<T> for Page<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter)
    }
}
