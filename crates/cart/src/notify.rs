//! Presentation notification signal.
//!
//! Presentation renders the outcome of a mutation however it likes (modal,
//! toast, inline banner); the core only hands it this three-valued signal.
//! Failure detail stays in the logs; the signal carries none of it, so raw
//! backend errors can never leak into the UI.

use crate::cache::CartEntry;
use crate::mutation::MutationOutcome;

/// What presentation should show the user after an add-to-cart attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotification {
    /// Confirm the add, with the stored entry for title and image display.
    ShowSuccess(CartEntry),
    /// Prompt the user to log in before adding to the cart.
    ShowUnauthenticatedWarning,
    /// A generic "couldn't add, try again" message.
    ShowGenericFailure,
}

impl From<&MutationOutcome> for CartNotification {
    fn from(outcome: &MutationOutcome) -> Self {
        match outcome {
            MutationOutcome::Success(entry) => Self::ShowSuccess(entry.clone()),
            MutationOutcome::Unauthenticated => Self::ShowUnauthenticatedWarning,
            MutationOutcome::RemoteFailure(_) => Self::ShowGenericFailure,
        }
    }
}
