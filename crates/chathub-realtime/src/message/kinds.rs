//! Event kind tags understood by browser clients.

/// A message was posted in a chat.
pub const NEW_MESSAGE: &str = "new_message";
/// A message was edited.
pub const MESSAGE_EDITED: &str = "message_edited";
/// A message was deleted.
pub const MESSAGE_DELETED: &str = "message_deleted";
/// A member read a message.
pub const MESSAGE_READ: &str = "message_read";
/// A chat was created with the recipient as a member.
pub const CHAT_CREATED: &str = "chat_created";
/// The recipient was invited to a chat.
pub const CHAT_INVITE: &str = "chat_invite";
/// Someone asked to join a chat the recipient administers.
pub const CHAT_JOIN_REQUEST: &str = "chat_join_request";
/// A chat was deleted.
pub const CHAT_DELETED: &str = "chat_deleted";
/// A member joined a chat.
pub const MEMBER_ADDED: &str = "member_added";
/// A member left or was removed from a chat.
pub const MEMBER_REMOVED: &str = "member_removed";
/// A contact request was created or answered.
pub const CONTACT_REQUEST: &str = "contact_request";
/// A member is typing.
pub const TYPING: &str = "typing";
