//! UI layer for the board window: app shell, flight table, claim dialog and toast.

pub mod app;

pub use app::FlightBoardApp;
