//! # Access Flow
//!
//! Step/tab navigation controller for the data-access group flow of an
//! InLong dashboard: business info, data streams, data sources, data
//! storages and the audit view.
//!
//! ## Features
//!
//! - **Two navigation modes**: a forward-gated creation wizard and freely
//!   switchable tabs for existing groups, resolved once from the route
//! - **Lazy mount, never unmount**: a step's content is created on first
//!   visit and kept alive so in-progress edits survive navigation
//! - **Commit-gated progress**: each step may expose an async commit that
//!   validates and persists before the wizard moves on
//! - **Route sync**: the wizard cursor lives in the `?step=` indicator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use access_flow::adapters::memory_history::MemoryHistory;
//! use access_flow::adapters::tracing_listener::TracingListener;
//! use access_flow::adapters::http_backend::HttpAccessBackend;
//! use access_flow::config::ManagerSettings;
//! use access_flow::domain::RouteTable;
//! use access_flow::flow::{FlowController, FlowPorts};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let ports = FlowPorts {
//!         navigator: Arc::new(MemoryHistory::new("/access/detail/b_demo")),
//!         backend: Arc::new(HttpAccessBackend::from_settings(&ManagerSettings::default())?),
//!         listener: Arc::new(TracingListener),
//!     };
//!     let flow = FlowController::new(RouteTable::default(), ports);
//!     flow.enrich().await?;
//!     println!("{:?}", flow.visible_steps());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: data model and the ports the controller talks through
//! - **Flow**: the controller, its cursor and its mount cache
//! - **Adapters**: HTTP backend, in-memory history, logging listener
//! - **Config**: settings for the command line tool

pub mod adapters;
pub mod domain;
pub mod error;
pub mod flow;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;

pub use error::{BackendError, CommitError, FlowError, FlowResult};
pub use flow::{FlowController, FlowPorts, Transition};
