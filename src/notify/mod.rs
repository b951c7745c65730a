// src/notify/mod.rs

pub mod discord;

pub use discord::DiscordNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Info,
    Success,
    Warning,
    Error,
    Startup,
}

impl Category {
    /// Embed colour shown next to the message.
    pub fn color(self) -> u32 {
        match self {
            Category::Info => 0x3498db,
            Category::Success => 0x2ecc71,
            Category::Warning => 0xf39c12,
            Category::Error => 0xe74c3c,
            Category::Startup => 0x9b59b6,
        }
    }
}

/// Fire-and-forget status messages. Implementations must swallow their own failures.
pub trait Notifier {
    fn notify(&self, message: &str, category: Category);
}

/// Drops every message.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _category: Category) {}
}
