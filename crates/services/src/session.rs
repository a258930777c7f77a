//! Explicit session context, passed into each component's constructor.
//! There is no ambient current-user global in this engine.

/// The authenticated user on whose behalf the engine operates. The session
/// credential itself travels inside the adapter; components only need the
/// identity for local decisions (self-request checks, message authorship).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}
