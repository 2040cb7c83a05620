//! Request lifecycle of a list or form

use leptos::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl LoadState {
    /// Enter `Loading`. Rejected (returns `false`) while a request is in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = LoadState::Loading;
        true
    }

    /// `Loading -> Success`; ignored in any other state
    pub fn succeed(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = LoadState::Success;
        true
    }

    /// `Loading -> Error`; ignored in any other state
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = LoadState::Error(message.into());
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Signal-side helpers, so views do not repeat the update closures
pub trait LoadStateSignal {
    fn try_begin(&self) -> bool;
    fn succeed(&self);
    fn fail(&self, message: String);
}

impl LoadStateSignal for RwSignal<LoadState> {
    fn try_begin(&self) -> bool {
        let mut started = false;
        self.update(|s| started = s.begin());
        started
    }

    fn succeed(&self) {
        self.update(|s| {
            s.succeed();
        });
    }

    fn fail(&self, message: String) {
        self.update(|s| {
            s.fail(message);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut s = LoadState::default();
        assert!(s.begin());
        assert!(s.is_loading());
        assert!(s.succeed());
        assert_eq!(s, LoadState::Success);
    }

    #[test]
    fn test_second_submit_rejected_while_loading() {
        let mut s = LoadState::Idle;
        assert!(s.begin());
        assert!(!s.begin());
        assert!(s.is_loading());
    }

    #[test]
    fn test_error_then_retry() {
        let mut s = LoadState::Idle;
        s.begin();
        assert!(s.fail("rede indisponível"));
        assert_eq!(s.error(), Some("rede indisponível"));
        assert!(s.begin());
        assert_eq!(s.error(), None);
    }

    #[test]
    fn test_completion_outside_loading_is_ignored() {
        let mut s = LoadState::Idle;
        assert!(!s.succeed());
        assert!(!s.fail("x"));
        assert_eq!(s, LoadState::Idle);
    }
}
