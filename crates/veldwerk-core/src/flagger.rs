//! Manual-review flagging.

use crate::types::{ProtocolCode, ReviewFlag};

/// The fields the flag is decided on.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagInput<'a> {
    pub code: Option<&'a ProtocolCode>,
    pub has_sunrise: bool,
    pub has_sunset: bool,
    pub clean_name: Option<&'a str>,
    pub raw_name: Option<&'a str>,
}

/// A visit needs a manual check when its protocol is the VM03 family
/// (no fixed timing convention exists, so no automatic correction can be
/// trusted), when either solar anchor is missing, or when it has no
/// usable display name.
pub fn review_flag(input: &FlagInput<'_>) -> ReviewFlag {
    let name = input.clean_name.or(input.raw_name).unwrap_or("");
    let vm03 = input.code.is_some_and(|code| code.has_prefix("VM03"));

    if vm03 || !input.has_sunrise || !input.has_sunset || name.trim().is_empty() {
        ReviewFlag::Yes
    } else {
        ReviewFlag::No
    }
}
