/// Separator between the two member ids inside a conversation id.
pub const CONVERSATION_ID_SEPARATOR: char = '_';

/// Default capacity of the in-process change event bus.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Default capacity of a live feed's delivery queue.
pub const DEFAULT_FEED_CAPACITY: usize = 16;
