//! Names of the events published on the bus.

/// A driver was linked to a service order.
pub const DISPATCH_ASSIGNED: &str = "dispatch.assigned";
/// A departure checklist was recorded; the assignment is `in_progress`.
pub const DISPATCH_DEPARTED: &str = "dispatch.departed";
/// An arrival checklist was recorded; the assignment is `completed` and
/// the order `finalized`.
pub const DISPATCH_ARRIVED: &str = "dispatch.arrived";
/// A chat message was stored.
pub const CHAT_MESSAGE_SENT: &str = "chat.message_sent";
/// A recipient marked a conversation as read.
pub const CHAT_MESSAGES_READ: &str = "chat.messages_read";
/// A user's first socket opened or last socket closed.
pub const PRESENCE_CHANGED: &str = "presence.changed";
