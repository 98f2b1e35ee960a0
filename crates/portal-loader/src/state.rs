//! Per-module load state machine
//!
//! ```text
//! NotRequested ──► Loading ──► Loaded
//!                    ▲  │
//!                    │  ▼
//!                    Failed
//! ```
//!
//! `Failed → Loading` is the retry edge. `Loaded` is terminal for the
//! lifetime of the loader.

use crate::error::LoadError;
use crate::module::RemoteModule;
use std::fmt;
use std::sync::Arc;

/// Observable state of one remote module
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Nobody asked for this module yet
    NotRequested,
    /// A fetch is in flight
    Loading,
    /// Fetched and extracted
    Loaded(Arc<dyn RemoteModule>),
    /// Last attempt failed; a new `load` will retry
    Failed(Arc<LoadError>),
}

impl LoadState {
    /// Phase of this state, without the payload
    #[inline]
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        match self {
            Self::NotRequested => LoadPhase::NotRequested,
            Self::Loading => LoadPhase::Loading,
            Self::Loaded(_) => LoadPhase::Loaded,
            Self::Failed(_) => LoadPhase::Failed,
        }
    }

    /// Loaded module, if any
    #[inline]
    #[must_use]
    pub fn module(&self) -> Option<&Arc<dyn RemoteModule>> {
        match self {
            Self::Loaded(module) => Some(module),
            _ => None,
        }
    }

    /// Failure, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&Arc<LoadError>> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Payload-free discriminant of [`LoadState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    /// Never requested
    NotRequested,
    /// Fetch in flight
    Loading,
    /// Ready to mount
    Loaded,
    /// Last attempt failed
    Failed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => write!(f, "NOT_REQUESTED"),
            Self::Loading => write!(f, "LOADING"),
            Self::Loaded => write!(f, "LOADED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Rejected state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal load state transition: {from} -> {to}")]
pub struct TransitionError {
    /// Phase before the attempted transition
    pub from: LoadPhase,
    /// Phase that was requested
    pub to: LoadPhase,
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: LoadPhase) -> &'static [LoadPhase] {
    use LoadPhase::{Failed, Loaded, Loading, NotRequested};
    match from {
        NotRequested | Failed => &[Loading],
        Loading => &[Loaded, Failed],
        Loaded => &[],
    }
}

/// Validates a state transition
pub fn validate_transition(from: LoadPhase, to: LoadPhase) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_request_starts_loading() {
        assert!(validate_transition(LoadPhase::NotRequested, LoadPhase::Loading).is_ok());
        assert!(validate_transition(LoadPhase::NotRequested, LoadPhase::Loaded).is_err());
        assert!(validate_transition(LoadPhase::NotRequested, LoadPhase::Failed).is_err());
    }

    #[test]
    fn loading_resolves_either_way() {
        assert!(validate_transition(LoadPhase::Loading, LoadPhase::Loaded).is_ok());
        assert!(validate_transition(LoadPhase::Loading, LoadPhase::Failed).is_ok());
        assert!(validate_transition(LoadPhase::Loading, LoadPhase::NotRequested).is_err());
    }

    #[test]
    fn failed_may_retry() {
        assert!(validate_transition(LoadPhase::Failed, LoadPhase::Loading).is_ok());
        assert!(validate_transition(LoadPhase::Failed, LoadPhase::Loaded).is_err());
    }

    #[test]
    fn loaded_is_terminal() {
        assert!(allowed_transitions(LoadPhase::Loaded).is_empty());
        let err = validate_transition(LoadPhase::Loaded, LoadPhase::Loading).unwrap_err();
        assert_eq!(err.to_string(), "illegal load state transition: LOADED -> LOADING");
    }

    fn any_phase() -> impl Strategy<Value = LoadPhase> {
        prop_oneof![
            Just(LoadPhase::NotRequested),
            Just(LoadPhase::Loading),
            Just(LoadPhase::Loaded),
            Just(LoadPhase::Failed),
        ]
    }

    proptest! {
        #[test]
        fn prop_validation_agrees_with_table(from in any_phase(), to in any_phase()) {
            let allowed = allowed_transitions(from);
            prop_assert_eq!(validate_transition(from, to).is_ok(), allowed.contains(&to));
        }

        #[test]
        fn prop_nothing_returns_to_not_requested(from in any_phase()) {
            prop_assert!(validate_transition(from, LoadPhase::NotRequested).is_err());
        }
    }
}
