use std::{fmt, hash};
use uuid::Uuid;

/// Identifies one probe in log output and assertion messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, hash::Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeId(u128);

impl ProbeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_u128())
    }
}

impl From<u128> for ProbeId {
    fn from(value: u128) -> Self {
        ProbeId(value)
    }
}

/// Short form: the first group of the UUID is enough to tell probes apart in a test run.
impl fmt::Display for ProbeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uuid = Uuid::from_u128(self.0);
        let text = uuid.simple().to_string();
        f.write_str(&text[..8])
    }
}

impl Default for ProbeId {
    fn default() -> Self {
        ProbeId::new()
    }
}
