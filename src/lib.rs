// Library surface for headless/integration tests and reuse.
// The binary only adds terminal setup and the CLI on top of this.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod timers;
pub mod ui;
pub mod util;
pub mod view;
