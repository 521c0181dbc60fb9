//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with model and chat status
//! - Patient form (11 clinical fields)
//! - Assessment result
//! - Chat with the cardiology assistant

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{ChatProgress, ChatWorker, ChatWorkerHandle};
