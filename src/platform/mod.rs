pub mod telegram;

/// A message received from any platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Platform identifier (e.g., "telegram")
    pub platform: String,
    /// Platform-specific author ID as string
    pub user_id: String,
    /// Platform-specific chat/channel ID as string
    pub chat_id: String,
    /// Display name of the author
    pub user_name: String,
    /// The message text
    pub text: String,
}

/// A reply sent back to the chat that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Preformatted text shown in a fixed-width font
    Monospace(String),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    /// Generic reply for a collaborator that failed
    pub fn unavailable(service: &str) -> Self {
        Reply::Text(format!(
            "Sorry, {} is temporarily unavailable. Please try again later.",
            service
        ))
    }

    /// The reply body without any monospace wrapping
    pub fn body(&self) -> &str {
        match self {
            Reply::Text(s) | Reply::Monospace(s) => s,
        }
    }
}
