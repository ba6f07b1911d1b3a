use console::Term;
use tokio_util::sync::CancellationToken;

/// Cancel the returned token on Ctrl+C; exit immediately on a second one.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let handler_token = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }

        let is_tty = Term::stdout().is_term();
        if is_tty {
            eprintln!("\nCancelling, waiting for the current operation to stop...");
            eprintln!("Press Ctrl+C again to force quit.");
        } else {
            tracing::warn!("Cancellation requested");
        }

        handler_token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            if is_tty {
                eprintln!("Force quit!");
            }
            std::process::exit(130);
        }
    });

    token
}
