//! Interaction controller: one state value, one writer.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ stdin / args │────►│   Command    │────►│   Reducer    │
//! │   (lines)    │     │   (parse)    │     │  (pure fn)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │
//!                                                  ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │ Render pass  │◄────│   UiState    │
//!                      │ (view build) │     │   (hashed)   │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! [`session::Session::dispatch`] runs reduce, derive and render for every
//! event before returning, so no intermediate state is ever observable.

pub mod command;
pub mod events;
pub mod reducer;
pub mod session;
pub mod state;
