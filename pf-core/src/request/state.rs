use pf_boundary::Error;

/// Lifecycle of a single remote request.
///
/// `Idle -> Loading -> {Success, Failure}`; a new request
/// re-enters `Loading` from any state.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(Error),
}

#[derive(Debug)]
pub enum Transition<T> {
    Start,
    Settle(Result<T, Error>),
}

impl<T> RequestState<T> {
    /// Applies a transition.
    ///
    /// Settling is accepted in every state: the outcome that
    /// arrives last is the one that is kept.
    #[must_use]
    pub fn transition(self, event: Transition<T>) -> Self {
        match event {
            Transition::Start => Self::Loading,
            Transition::Settle(Ok(data)) => Self::Success(data),
            Transition::Settle(Err(err)) => Self::Failure(err),
        }
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failure(_))
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}
