//! Controller layer: user actions and status-line updates for the board window.

pub mod events;
