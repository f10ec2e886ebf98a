use serde::Serialize;

/// Ordered sequence of destinations, root first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NavigationPath<D> {
    destinations: Vec<D>,
}

impl<D> Default for NavigationPath<D> {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
        }
    }
}

impl<D> NavigationPath<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn as_slice(&self) -> &[D] {
        &self.destinations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, D> {
        self.destinations.iter()
    }

    /// The top-most destination.
    pub fn last(&self) -> Option<&D> {
        self.destinations.last()
    }

    pub fn push(&mut self, destination: D) {
        self.destinations.push(destination);
    }

    pub fn pop(&mut self) -> Option<D> {
        self.destinations.pop()
    }

    /// Keep only the first `len` destinations.
    pub fn truncate(&mut self, len: usize) {
        self.destinations.truncate(len);
    }

    pub fn into_vec(self) -> Vec<D> {
        self.destinations
    }
}

impl<D: PartialEq> NavigationPath<D> {
    /// Number of leading destinations shared with `other`.
    pub fn common_prefix_len(&self, other: &NavigationPath<D>) -> usize {
        self.iter()
            .zip(other.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn starts_with(&self, prefix: &NavigationPath<D>) -> bool {
        self.destinations.starts_with(&prefix.destinations)
    }
}

impl<D> From<Vec<D>> for NavigationPath<D> {
    fn from(destinations: Vec<D>) -> Self {
        Self { destinations }
    }
}

impl<D> FromIterator<D> for NavigationPath<D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        Self {
            destinations: iter.into_iter().collect(),
        }
    }
}

impl<'a, D> IntoIterator for &'a NavigationPath<D> {
    type Item = &'a D;
    type IntoIter = std::slice::Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.destinations.iter()
    }
}
