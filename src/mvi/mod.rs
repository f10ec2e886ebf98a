//! Unidirectional data-flow primitives shared by channels, coordinators and
//! navigators.
//!
//! # Architecture
//!
//! ```text
//! View ──publish──→ Interface ──→ Observer ──→ Coordinator::handle
//!  ↑                                                  │
//!  └──── entry_view() ←── state ←── Reducer ←─────────┘
//! ```
//!
//! - **Intent**: a value a view reports upward (an action)
//! - **UiState**: the data a view is derived from
//! - **Reducer**: the only place a state transition is decided

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
