//! Load state for values fetched in the background.
//!
//! `Loading` and `Error` keep the last successful value so the board can
//! keep showing stale data with a status indicator instead of blanking.

/// Progress of a fetch, with the last known-good value retained.
///
/// ```
/// use departure_board::state::LoadState;
///
/// let state: LoadState<u32, String> = LoadState::initial();
/// assert_eq!(state.value(), None);
///
/// let state = state.succeed(7);
/// let state = state.start_loading();
/// assert!(state.is_loading());
/// assert_eq!(state.value(), Some(&7));
///
/// let state = state.fail("timeout".to_string());
/// assert_eq!(state.value(), Some(&7));
/// assert_eq!(state.error().map(String::as_str), Some("timeout"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T, E> {
    /// A fetch is in flight. `previous` is the last value, if any.
    Loading { previous: Option<T> },

    /// The most recent fetch succeeded.
    Success { value: T },

    /// The most recent fetch failed. `previous` is the last value, if any.
    Error { previous: Option<T>, cause: E },
}

impl<T, E> LoadState<T, E> {
    /// Nothing fetched yet, first fetch pending.
    pub fn initial() -> Self {
        LoadState::Loading { previous: None }
    }

    /// The current value: the payload on success, otherwise the retained
    /// previous payload. `None` means nothing has been fetched yet, not an
    /// error.
    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Loading { previous } => previous.as_ref(),
            LoadState::Success { value } => Some(value),
            LoadState::Error { previous, .. } => previous.as_ref(),
        }
    }

    /// Consume the state, keeping only the value.
    pub fn into_value(self) -> Option<T> {
        match self {
            LoadState::Loading { previous } => previous,
            LoadState::Success { value } => Some(value),
            LoadState::Error { previous, .. } => previous,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadState::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error { .. })
    }

    /// True when a value is shown but it isn't from the most recent fetch.
    pub fn is_stale(&self) -> bool {
        !self.is_success() && self.value().is_some()
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            LoadState::Error { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Enter `Loading`, carrying the current value forward.
    pub fn start_loading(self) -> Self {
        LoadState::Loading {
            previous: self.into_value(),
        }
    }

    /// Enter `Success` with a fresh value.
    pub fn succeed(self, value: T) -> Self {
        LoadState::Success { value }
    }

    /// Enter `Error`, carrying the current value forward.
    pub fn fail(self, cause: E) -> Self {
        LoadState::Error {
            previous: self.into_value(),
            cause,
        }
    }

    /// Apply a fetch outcome.
    pub fn resolve(self, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => self.succeed(value),
            Err(cause) => self.fail(cause),
        }
    }

    /// Transform the payload, keeping the state and cause.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U, E> {
        match self {
            LoadState::Loading { previous } => LoadState::Loading {
                previous: previous.map(f),
            },
            LoadState::Success { value } => LoadState::Success { value: f(value) },
            LoadState::Error { previous, cause } => LoadState::Error {
                previous: previous.map(f),
                cause,
            },
        }
    }
}

impl<T, E> Default for LoadState<T, E> {
    fn default() -> Self {
        Self::initial()
    }
}
