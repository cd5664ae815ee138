use std::future::Future;

use tracing::error;

use super::error::AppError;

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM)
///
/// A signal ends the process immediately; writes in flight are not awaited.
pub struct CliApp {
    name: String,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the application, racing it against termination signals
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let code = tokio::select! {
            result = main_fn() => Self::exit_code(&self.name, result),
            signal_code = Self::wait_for_signal() => signal_code,
        };
        std::process::exit(code);
    }

    fn exit_code(name: &str, result: Result<(), AppError>) -> i32 {
        match result {
            Ok(()) => 0,
            Err(e) => {
                error!("{}", e);
                eprintln!("{}: error: {}", name, e);
                1
            }
        }
    }

    /// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
    /// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
    async fn wait_for_signal() -> i32 {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let (Ok(mut sigterm), Ok(mut sigint), Ok(mut sighup)) = (
                signal(SignalKind::terminate()),
                signal(SignalKind::interrupt()),
                signal(SignalKind::hangup()),
            ) else {
                error!("Cannot install signal handlers");
                return std::future::pending().await;
            };

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
            if tokio::signal::ctrl_c().await.is_err() {
                error!("Cannot install Ctrl+C handler");
                return std::future::pending().await;
            }
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
        let app = CliApp::new("memc-load");
        assert_eq!(app.name(), "memc-load");
    }

    #[test]
    fn exit_code_reflects_result() {
        assert_eq!(CliApp::exit_code("t", Ok(())), 0);
        assert_eq!(
            CliApp::exit_code("t", Err(AppError::InvalidArguments("x".to_string()))),
            1
        );
    }
}
