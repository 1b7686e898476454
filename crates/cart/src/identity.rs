//! Session identity resolution.
//!
//! The mutation core never talks to the authentication provider directly; it
//! asks a [`SessionGate`] for the current actor. Absence of identity is a
//! normal state ([`Identity::Anonymous`]), never an error.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use marigold_core::UserId;

/// The resolved actor performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    /// A signed-in user with a stable opaque identifier.
    Authenticated {
        /// Backend-issued user identifier.
        user_id: UserId,
    },
    /// No session identity is present.
    #[default]
    Anonymous,
}

impl Identity {
    /// Whether a user identity is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The user ID, if authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Authenticated { user_id } => Some(user_id),
            Self::Anonymous => None,
        }
    }
}

/// Contract the mutation core requires from the session provider.
///
/// Resolution is side-effect free from the core's perspective and callable
/// repeatedly; the gate may cache internally. There is no error return:
/// a provider that cannot resolve an identity reports [`Identity::Anonymous`].
pub trait SessionGate {
    /// Resolve the identity of the current actor.
    fn resolve_identity(&self) -> impl Future<Output = Identity> + Send;
}

/// In-process session gate backed by shared session-scoped state.
///
/// The surrounding application flips the identity on login and logout via
/// [`sign_in`](Self::sign_in) / [`sign_out`](Self::sign_out); the mutation
/// core only ever reads it. Handles are cheap clones sharing one slot, so a
/// gate given to the mutator observes later sign-ins.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentityGate {
    inner: Arc<RwLock<Identity>>,
}

impl SessionIdentityGate {
    /// Create a gate with no signed-in user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate already holding the given identity.
    #[must_use]
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            inner: Arc::new(RwLock::new(identity)),
        }
    }

    /// Record a successful login.
    pub fn sign_in(&self, user_id: UserId) {
        *self.write() = Identity::Authenticated { user_id };
    }

    /// Clear the session identity on logout.
    pub fn sign_out(&self) {
        *self.write() = Identity::Anonymous;
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Identity> {
        // A poisoned slot still holds a coherent Identity value.
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionGate for SessionIdentityGate {
    async fn resolve_identity(&self) -> Identity {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
