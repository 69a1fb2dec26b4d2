//! Fixed symposium event catalog
//!
//! The id → display-name table used by validation, the registration detail
//! view and confirmation emails. Ids are 1-based and contiguous.

/// Highest valid event id
pub const MAX_EVENT_ID: u8 = 12;

/// Display name used for ids outside the catalog
pub const UNKNOWN_EVENT: &str = "Unknown Event";

pub const EVENT_CATALOG: [(u8, &str); MAX_EVENT_ID as usize] = [
    (1, "AI Workshop"),
    (2, "Blockchain Summit"),
    (3, "Web3 Development"),
    (4, "Cybersecurity Lab"),
    (5, "Cloud Computing"),
    (6, "Data Science"),
    (7, "Startup Pitch"),
    (8, "Leadership Talk"),
    (9, "Design Thinking"),
    (10, "Career Growth"),
    (11, "Networking Hub"),
    (12, "Innovation Panel"),
];

pub fn is_valid_event_id(id: i64) -> bool {
    (1..=i64::from(MAX_EVENT_ID)).contains(&id)
}

pub fn event_name(id: u8) -> &'static str {
    EVENT_CATALOG
        .iter()
        .find(|(event_id, _)| *event_id == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_EVENT)
}
