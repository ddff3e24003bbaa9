use std::sync::Arc;

use tokio::sync::mpsc;

use crate::database::DatabaseError;

/// Shared request state.
///
/// Holds the database facade and a channel the handlers use to ask the
/// binary to terminate after a fatal database failure.
pub struct AppState<S> {
    pub database: Arc<S>,
    fatal_tx: mpsc::UnboundedSender<String>,
}

impl<S> AppState<S> {
    /// Create the state and the receiving end of the fatal-error channel.
    pub fn new(database: Arc<S>) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

        let state = Self { database, fatal_tx };

        (state, fatal_rx)
    }

    /// Ask the process to shut down because of `error`.
    pub fn report_fatal(&self, error: &DatabaseError) {
        // Receiver is gone once shutdown is already underway.
        let _ = self.fatal_tx.send(error.to_string());
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            fatal_tx: self.fatal_tx.clone(),
        }
    }
}
