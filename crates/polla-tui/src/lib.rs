// Library root: the application orchestrator, the channel protocol between
// it and the terminal front-end, and the front-end itself.

pub mod app;
pub mod protocol;
pub mod tui;
