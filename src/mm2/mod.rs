//! Trading daemon boundary: JSON-RPC client, wire models, and process
//! supervision.

pub mod client;
pub mod model;
pub mod process;

pub use client::Mm2Client;
pub use process::Mm2Process;
