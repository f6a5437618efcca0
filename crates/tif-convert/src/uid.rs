//! Node identifier generation

use uuid::Uuid;

/// Source of fresh node uids
pub trait UidSource: Send {
    fn next_uid(&mut self) -> String;
}

/// Random uuid-v4 uids (default)
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUids;

impl UidSource for RandomUids {
    fn next_uid(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Counter-based uids for reproducible output
#[derive(Debug, Clone)]
pub struct SequentialUids {
    prefix: String,
    next: u64,
}

impl SequentialUids {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialUids {
    fn default() -> Self {
        Self::new("uid-")
    }
}

impl UidSource for SequentialUids {
    fn next_uid(&mut self) -> String {
        self.next += 1;
        format!("{}{}", self.prefix, self.next)
    }
}
