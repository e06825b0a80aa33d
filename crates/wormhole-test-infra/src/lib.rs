//! Test doubles for the Wormhole client crates.
//!
//! - [`MemoryService`]: an in-process stand-in for the redirection service.
//! - [`FakeUrlApi`]: a [`UrlApi`](wormhole_core::UrlApi) over a
//!   `MemoryService` with failure and latency injection.
//! - [`MockServer`]: the same service exposed over HTTP on an ephemeral port.

pub mod error;
pub mod fake;
pub mod memory;
pub mod server;

pub use error::{Result, TestInfraError};
pub use fake::{Call, FakeUrlApi};
pub use memory::MemoryService;
pub use server::MockServer;
