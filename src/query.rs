/// Loading state of one view's data
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing requested yet
    Idle,
    Loading,
    Failed(String),
    Ready(T),
}

/// Tracks the request a view is currently interested in.
///
/// Fetches run concurrently with navigation, so a result may arrive after
/// the view has moved on. Results are tagged with the key they were
/// requested for and anything that doesn't match the current key is
/// dropped.
#[derive(Debug, Clone)]
pub struct Query<K, T> {
    key: Option<K>,
    state: LoadState<T>,
}

impl<K, T> Default for Query<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            state: LoadState::Idle,
        }
    }
}

impl<K: PartialEq, T> Query<K, T> {
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Start waiting for `key`
    pub fn start(&mut self, key: K) {
        self.key = Some(key);
        self.state = LoadState::Loading;
    }

    /// Settle immediately, e.g. from the cache
    pub fn ready(&mut self, key: K, data: T) {
        self.key = Some(key);
        self.state = LoadState::Ready(data);
    }

    /// Apply a fetch result. Returns false (and changes nothing) when the
    /// result belongs to a key the view no longer wants.
    pub fn resolve(&mut self, key: &K, result: std::result::Result<T, String>) -> bool {
        if self.key.as_ref() != Some(key) {
            return false;
        }
        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(msg) => LoadState::Failed(msg),
        };
        true
    }
}
