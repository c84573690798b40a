//! All possible UI actions. Actions are the sole mechanism for state mutation.

use chainpulse_core::{FetchState, Network, Selection, Timeframe};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data events (from the controller watch channels) ───────────
    StateChanged(FetchState),
    SelectionChanged(Selection),

    // ── User intents (forwarded to the controller) ─────────────────
    SelectNetwork(Network),
    SelectTimeframe(Timeframe),
    Retry,

    // ── Presentation-local ─────────────────────────────────────────
    CycleChartField,
}
