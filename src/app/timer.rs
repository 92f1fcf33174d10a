//! Drives the progress animation at a fixed interval.

use super::state::{AppState, Event};
use std::thread;
use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Starts a ticker thread that sends [`Event::Tick`] every [`TICK_INTERVAL`]
/// until it is stopped or the event channel closes.
pub fn start_ticker(state: &mut AppState, event_tx: crossbeam_channel::Sender<Event>) {
    // Ensure any existing ticker is stopped before starting a new one.
    stop_ticker(state);

    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
    state.ticker_shutdown_tx = Some(shutdown_tx);

    log::debug!("Starting progress ticker");

    thread::spawn(move || loop {
        match shutdown_rx.recv_timeout(TICK_INTERVAL) {
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                if event_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
            // Stop signal, or the sender was dropped with the state.
            _ => {
                log::debug!("Progress ticker stopped");
                break;
            }
        }
    });
}

/// Stops the current ticker thread, if one is running.
pub fn stop_ticker(state: &mut AppState) {
    if let Some(shutdown_tx) = state.ticker_shutdown_tx.take() {
        let _ = shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::i18n;
    use crate::app::settings::Settings;
    use std::path::PathBuf;

    #[test]
    fn test_ticker_sends_ticks_until_stopped() {
        let mut state = AppState::new(Settings::new(PathBuf::from("drivers")), i18n::builtin());
        let (tx, rx) = crossbeam_channel::unbounded();

        start_ticker(&mut state, tx);
        assert!(state.ticker_shutdown_tx.is_some());
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(Event::Tick));
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(Event::Tick));

        stop_ticker(&mut state);
        assert!(state.ticker_shutdown_tx.is_none());
        // The thread exits and drops its sender, which disconnects the channel.
        while rx.recv_timeout(Duration::from_secs(2)).is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
