//! WebSocket front end for Scrawl.
//!
//! Ties the layers together: the accept loop produces connections, each
//! connection handler decodes frames and dispatches them into the
//! [`Registry`](scrawl_room::Registry), and rooms fan their broadcasts
//! back out through per-connection writer tasks.

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::ScrawlServer;
