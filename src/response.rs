use std::slice;
use std::vec;

/// One page of query results, filled in by a [`ChoiceProvider`](crate::ChoiceProvider).
#[derive(Clone, Debug, PartialEq)]
pub struct Response<T> {
    results: Vec<T>,
    has_more: bool,
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Response<T> {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            has_more: false,
        }
    }

    pub fn add(&mut self, result: T) {
        self.results.push(result);
    }

    pub fn add_all<I>(&mut self, results: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.results.extend(results);
    }

    /// Whether the widget may ask for the next page.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.has_more = false;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.results
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.results.iter()
    }
}

impl<T> Extend<T> for Response<T> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.add_all(iter);
    }
}

impl<T> IntoIterator for Response<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Response<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
