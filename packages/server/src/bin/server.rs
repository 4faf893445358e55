//! Hearth relay server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hearth-server -- --port 8080
//! ```

use clap::Parser;

use hearth_server::config::{
    DEFAULT_MALFORMED_LIMIT, DEFAULT_OUTBOUND_CAPACITY, ServerConfig,
};
use hearth_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "hearth-server", about = "Hearth chat relay server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Outbound frames queued per connection
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,

    /// Buffered messages kept per house
    #[arg(long, default_value_t = hearth_server::domain::entity::DEFAULT_MESSAGE_CAPACITY)]
    message_capacity: usize,

    /// Malformed frames tolerated before a connection is closed
    #[arg(long, default_value_t = DEFAULT_MALFORMED_LIMIT)]
    malformed_limit: u32,

    /// HS256 secret for bearer tokens (omit to refuse bearer connects)
    #[arg(long, env = "HEARTH_JWT_SECRET")]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        outbound_capacity: args.outbound_capacity,
        message_capacity: args.message_capacity,
        malformed_limit: args.malformed_limit,
        jwt_secret: args.jwt_secret,
    };

    if let Err(e) = hearth_server::ui::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
