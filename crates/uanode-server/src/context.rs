//! Per-request context.

use std::sync::Arc;

use crate::session::Session;

/// State the service layer threads through every node operation.
///
/// Carries the calling session, if there is one. Node operations treat a
/// missing session as "no caller" and fail closed.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    session: Option<Arc<Session>>,
}

impl RequestContext {
    /// A context with no session, as used by internal server tasks.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn for_session(session: Arc<Session>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_deref()
    }
}

impl From<Arc<Session>> for RequestContext {
    fn from(session: Arc<Session>) -> Self {
        Self::for_session(session)
    }
}
