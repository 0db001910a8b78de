//! Serving with graceful shutdown
//!
//! The accept loop and a signal waiter share a `CancellationToken`. Once it
//! is cancelled the listener stops accepting and in-flight requests drain;
//! whatever is still running after the grace period is aborted.

use std::{future::IntoFuture, io, time::Duration};

use axum::Router;
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Cancel `token` on Ctrl+C or SIGTERM
///
/// The waiter also ends when the token is cancelled elsewhere.
pub fn spawn_shutdown_waiter(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = wait_for_signal() => token.cancel(),
            () = token.cancelled() => {},
        }
    })
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

/// Serve `app` until `token` is cancelled, then drain for at most `grace`
///
/// # Errors
///
/// Returns an error if the server fails or its task panics.
pub async fn serve_until_cancelled(
    listener: TcpListener,
    app: Router,
    token: CancellationToken,
    grace: Duration,
) -> io::Result<()> {
    let stop = token.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { stop.cancelled().await })
        .into_future();
    let mut handle = tokio::spawn(server);

    tokio::select! {
        result = &mut handle => return result.map_err(io::Error::other)?,
        () = token.cancelled() => {},
    }

    info!(grace = ?grace, "Draining in-flight requests");
    if let Ok(result) = tokio::time::timeout(grace, &mut handle).await {
        result.map_err(io::Error::other)?
    } else {
        warn!("Grace period elapsed, aborting remaining connections");
        handle.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use axum::routing::get;

    use super::*;

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    #[tokio::test]
    async fn stops_after_cancellation() {
        let (listener, url) = bind().await;
        let app = Router::new().route("/", get(|| async { "ok" }));
        let token = CancellationToken::new();

        let server = tokio::spawn(serve_until_cancelled(
            listener,
            app,
            token.clone(),
            Duration::from_secs(5),
        ));

        let body = reqwest::get(&url).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");

        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn slow_request_is_cut_off_after_grace() {
        let (listener, url) = bind().await;
        let app = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let token = CancellationToken::new();

        let server = tokio::spawn(serve_until_cancelled(
            listener,
            app,
            token.clone(),
            Duration::from_millis(100),
        ));
        let in_flight = tokio::spawn(reqwest::get(url));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        token.cancel();
        let result = server.await.unwrap();

        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
        in_flight.abort();
    }

    #[tokio::test]
    async fn waiter_ends_when_token_is_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let waiter = spawn_shutdown_waiter(token.clone());

        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
