//! Which top-level outcome a protected route renders for a session.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use super::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateView {
    /// Placeholder while a session check or auth call is in flight.
    Loading,
    /// Send the visitor to the auth page.
    Anonymous,
    Authenticated,
}

/// Loading takes precedence so a pending restore never shows the anonymous
/// view first.
#[must_use]
pub fn select_view(state: &SessionState) -> GateView {
    if state.is_loading {
        GateView::Loading
    } else if state.is_authenticated() {
        GateView::Authenticated
    } else {
        GateView::Anonymous
    }
}
