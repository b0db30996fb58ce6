use std::future::Future;

use super::error::AppError;

/// Application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM)
pub struct CliApp {
    _name: String,
}

impl CliApp {
    /// Create a new application runner
    pub fn new(name: &str) -> Self {
        Self {
            _name: name.to_string(),
        }
    }

    /// Run the application with signal handling.
    ///
    /// This function never returns - it calls std::process::exit with the
    /// appropriate code
    pub async fn run<Fut>(self, main_fut: Fut) -> !
    where
        Fut: Future<Output = Result<(), AppError>>,
    {
        let signal_fut = self.wait_for_signal();

        // Race the application logic against signal reception
        tokio::select! {
            result = main_fut => {
                match result {
                    Ok(()) => std::process::exit(0),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        std::process::exit(1);
                    }
                }
            }
            signal_code = signal_fut => {
                std::process::exit(signal_code);
            }
        }
    }

    /// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
    /// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
    async fn wait_for_signal(&self) -> i32 {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm =
                signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");
            let mut sighup = signal(SignalKind::hangup()).expect("Failed to setup SIGHUP handler");

            tokio::select! {
                _ = sigterm.recv() => {
                    eprintln!("Received SIGTERM");
                    143 // 128 + 15
                }
                _ = sigint.recv() => {
                    eprintln!("Received SIGINT");
                    130 // 128 + 2
                }
                _ = sighup.recv() => {
                    eprintln!("Received SIGHUP");
                    129 // 128 + 1
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to setup Ctrl+C handler");
            eprintln!("Received Ctrl+C");
            130
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_app_new() {
        let app = CliApp::new("orderbench");
        assert_eq!(app._name, "orderbench");
    }
}
