//! # adapter-demo
//!
//! Terminal demo for the wallet adapter: pick a URL-based or injected
//! wallet, submit one fixed transaction, sign a proof-of-ownership message,
//! and watch every step land in an on-screen log.

pub mod app;
pub mod config;
pub mod encoding;
pub mod flows;
pub mod log_store;
pub mod payload;
pub mod selector;
pub mod view;

pub use app::{Action, App, AppEvent};
pub use config::{ConfigError, DemoConfig};
pub use flows::{FlowError, SubmissionStage};
pub use log_store::{LogSink, LogStore};
