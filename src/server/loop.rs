// Server loop module
// Accepts connections until the shutdown signal fires

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::logger;
use crate::state::AppState;

/// Accept and dispatch connections until `state.shutdown_signal` is notified.
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
/// Connections still in flight at shutdown finish on their own tasks.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::clone(&state.shutdown_signal);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    let local_addr = listener.local_addr()?;
    drop(listener);
    logger::log_info(&format!(
        "Stopped listening on {local_addr} ({} connection(s) still active)",
        active_connections.load(Ordering::SeqCst)
    ));
    logger::log_server_stop();
    Ok(())
}
