//! Record store implementations.
//!
//! - `local`: In-memory implementation used by the server, tests and local
//!   development
pub mod local;

pub use local::LocalRepository;
