use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Illegal {entity} status transition: {from} -> {to}")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {entity} status '{label}'")]
pub struct UnknownStatus {
    pub entity: &'static str,
    pub label: String,
}

/// A status label with an explicit table of legal successors.
pub trait StatusFlow: Copy + PartialEq + fmt::Display + 'static {
    const ENTITY: &'static str;

    fn allowed_next(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                entity: Self::ENTITY,
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}
