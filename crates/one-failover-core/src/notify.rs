//! Parsing of keepalived `vrrp_notify_fifo` lines
//!
//! keepalived writes one line per state transition in the form
//! `TYPE "NAME" STATE PRIORITY` with the name and state optionally
//! double-quoted.

use crate::event::{VrrpEvent, VrrpEventKind, VrrpState};

/// Structure a raw notification line
///
/// Splits on whitespace and zips the four fixed fields onto the tokens in
/// order. Surplus tokens are ignored, missing trailing tokens stay `None`.
/// A priority that is not an integer is dropped. Never fails.
#[must_use]
pub fn parse_notify_line(line: &str) -> VrrpEvent {
    let mut tokens = line.split_whitespace().map(unquote);
    let kind = tokens
        .next()
        .map_or(VrrpEventKind::Unknown, VrrpEventKind::from_name);
    let name = tokens.next().map(ToOwned::to_owned);
    let state = tokens.next().map(VrrpState::from_name);
    let priority = tokens.next().and_then(|token| token.parse().ok());
    VrrpEvent {
        kind,
        name,
        state,
        priority,
    }
}

// Strips at most one leading and one trailing double quote
fn unquote(token: &str) -> &str {
    let token = token.strip_prefix('"').unwrap_or(token);
    token.strip_suffix('"').unwrap_or(token)
}
