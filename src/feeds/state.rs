use super::FeedError;

/// Lifecycle of one feed: `Idle → Requested → Succeeded | Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState<T> {
    #[default]
    Idle,
    Requested,
    Succeeded(T),
    Failed(FeedError),
}

impl<T> FeedState<T> {
    /// Returns false (and keeps the state) unless the feed is idle.
    pub fn request(&mut self) -> bool {
        if !matches!(self, FeedState::Idle) {
            return false;
        }
        *self = FeedState::Requested;
        true
    }

    pub fn succeed(&mut self, value: T) -> bool {
        if !matches!(self, FeedState::Requested) {
            return false;
        }
        *self = FeedState::Succeeded(value);
        true
    }

    pub fn fail(&mut self, error: FeedError) -> bool {
        if !matches!(self, FeedState::Requested) {
            return false;
        }
        *self = FeedState::Failed(error);
        true
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FeedState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FeedState::Requested)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, FeedState::Succeeded(_) | FeedState::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_the_happy_path() {
        let mut state = FeedState::Idle;
        assert!(state.request());
        assert!(state.is_pending());
        assert!(state.succeed(7));
        assert_eq!(state.value(), Some(&7));
        assert!(state.is_settled());
    }

    #[test]
    fn rejects_out_of_order_transitions() {
        let mut state: FeedState<u32> = FeedState::Idle;
        assert!(!state.succeed(1));
        assert!(!state.fail(FeedError::EmptySeries));
        assert_eq!(state, FeedState::Idle);

        state.request();
        assert!(!state.request());
        assert!(state.fail(FeedError::Network("refused".into())));
        assert!(!state.succeed(1));
        assert!(matches!(state, FeedState::Failed(FeedError::Network(_))));
    }
}
