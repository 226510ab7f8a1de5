//! Reusable data-loading contract shared by the panels.
//!
//! Each fetch is stamped with a [`RequestToken`]. Starting a new fetch aborts
//! the previous task (if one is tracked) and makes its token stale, so only
//! the most recently issued request can change the state.

use tokio::task::AbortHandle;

/// Lifecycle of a single data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// State holder for one fetch-and-render data source.
#[derive(Debug)]
pub struct Loader<T> {
    state: LoadState<T>,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            generation: 0,
            in_flight: None,
        }
    }
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request: cancels the previous one and enters `Loading`.
    ///
    /// Any previous error or data is dropped.
    pub fn begin(&mut self) -> RequestToken {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
        self.state = LoadState::Loading;
        RequestToken(self.generation)
    }

    /// Remember the spawned task so the next `begin` can abort it.
    pub fn track(&mut self, handle: AbortHandle) {
        self.in_flight = Some(handle);
    }

    /// True if `token` belongs to the latest request.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }

    /// Apply a result. Returns `false` (and changes nothing) for stale tokens.
    pub fn complete(&mut self, token: RequestToken, result: Result<T, String>) -> bool {
        if !self.is_current(token) {
            tracing::debug!("Discarding stale response (token {}, current {})", token.0, self.generation);
            return false;
        }

        self.in_flight = None;
        self.state = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(message) => LoadState::Failed(message),
        };
        true
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_enters_loading() {
        let mut loader: Loader<u32> = Loader::new();
        assert_eq!(loader.state(), &LoadState::Idle);

        loader.begin();
        assert!(loader.is_loading());
        assert!(loader.data().is_none());
        assert!(loader.error().is_none());
    }

    #[test]
    fn test_complete_success_and_failure() {
        let mut loader = Loader::new();

        let token = loader.begin();
        assert!(loader.complete(token, Ok(7)));
        assert_eq!(loader.data(), Some(&7));

        let token = loader.begin();
        assert!(loader.complete(token, Err("boom".to_string())));
        assert_eq!(loader.error(), Some("boom"));
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut loader = Loader::new();

        let first = loader.begin();
        let second = loader.begin();

        // Second answers first, then the slow first request arrives.
        assert!(loader.complete(second, Ok("fresh")));
        assert!(!loader.complete(first, Ok("stale")));
        assert_eq!(loader.data(), Some(&"fresh"));
    }

    #[test]
    fn test_stale_response_while_loading() {
        let mut loader: Loader<&str> = Loader::new();

        let first = loader.begin();
        let _second = loader.begin();

        assert!(!loader.complete(first, Err("old failure".to_string())));
        assert!(loader.is_loading());
        assert!(loader.error().is_none());
    }

    #[test]
    fn test_refresh_clears_previous_error() {
        let mut loader: Loader<()> = Loader::new();
        let token = loader.begin();
        loader.complete(token, Err("offline".to_string()));
        assert!(loader.error().is_some());

        loader.begin();
        assert!(loader.error().is_none());
        assert!(loader.is_loading());
    }

    #[tokio::test]
    async fn test_begin_aborts_tracked_task() {
        let mut loader: Loader<()> = Loader::new();
        loader.begin();

        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        loader.track(task.abort_handle());

        loader.begin();

        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
