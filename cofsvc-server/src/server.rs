//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use cofsvc_core::orders::OrderStreamGenerator;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(api::router())
        // Add state to all routes
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    active_streams: usize,
}

/// Simple health check - returns OK if the server is running.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        active_streams: state.orders.active_subscriptions(),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(
    router: Router,
    addr: SocketAddr,
    orders: Arc<OrderStreamGenerator>,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    serve(listener, router, orders, shutdown_signal()).await
}

/// Serve `router` on `listener` until `signal` completes.
///
/// Order streams never end on their own, so graceful shutdown would wait on
/// them forever. Once `signal` fires, every open stream is cancelled and the
/// connections carrying them can drain.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    orders: Arc<OrderStreamGenerator>,
    signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!(
                active_streams = orders.active_subscriptions(),
                "Closing open order streams"
            );
            orders.shutdown();
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::FileConfig;
    use cofsvc_core::catalog::{Catalog, MemoryCatalog, seed_catalog};
    use cofsvc_core::entities::coffee::CoffeeRecord;
    use cofsvc_sdk::client::{ClientError, CoffeeClient};
    use futures_util::StreamExt;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::{Instant, timeout, timeout_at};
    use url::Url;

    const TICK: Duration = Duration::from_millis(200);

    struct RunningServer {
        client: CoffeeClient,
        state: AppState,
        stop: oneshot::Sender<()>,
        handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
    }

    async fn start_server() -> RunningServer {
        let catalog = Catalog::Memory(MemoryCatalog::new());
        seed_catalog(&catalog, &["A", "B", "C", "D"]).await.unwrap();
        start_server_with(catalog).await
    }

    async fn start_server_with(catalog: Catalog) -> RunningServer {
        let mut config = FileConfig::default();
        config.orders.interval_ms = TICK.as_millis() as u64;
        let state = AppState::new(catalog, config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            build_router(state.clone()),
            state.orders.clone(),
            async move {
                let _ = stopped.await;
            },
        ));

        let client = CoffeeClient::new(Url::parse(&format!("http://{addr}")).unwrap());
        RunningServer {
            client,
            state,
            stop,
            handle,
        }
    }

    #[tokio::test]
    async fn test_seeded_catalog_end_to_end() {
        let server = start_server().await;
        let client = &server.client;

        let all = client.list_coffees().await.unwrap();
        let mut names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["A", "B", "C", "D"]);

        let a = all.iter().find(|c| c.name == "A").unwrap();
        assert_eq!(client.get_coffee(&a.id).await.unwrap().as_ref(), Some(a));
        assert_eq!(client.get_coffee("not-a-coffee").await.unwrap(), None);

        // Collect for 3.5 intervals.
        let b = all.iter().find(|c| c.name == "B").unwrap();
        let mut stream = Box::pin(client.stream_orders(&b.id).await.unwrap());
        let deadline = Instant::now() + TICK * 7 / 2;
        let mut orders = Vec::new();
        while let Ok(Some(order)) = timeout_at(deadline, stream.next()).await {
            orders.push(order.unwrap());
        }

        assert!((3..=4).contains(&orders.len()), "got {} orders", orders.len());
        assert!(orders.iter().all(|o| o.coffee_id == b.id));
        assert!(orders.windows(2).all(|w| w[1].now > w[0].now));

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_open_streams() {
        let server = start_server().await;
        let mut stream = Box::pin(server.client.stream_orders("any").await.unwrap());
        stream.next().await.unwrap().unwrap();
        assert_eq!(server.state.orders.active_subscriptions(), 1);

        server.stop.send(()).unwrap();
        let result = timeout(Duration::from_secs(5), server.handle)
            .await
            .expect("graceful shutdown hung on an open stream");
        result.unwrap().unwrap();
        assert_eq!(server.state.orders.active_subscriptions(), 0);

        // The client observes the end of the stream rather than more orders.
        let rest: Vec<_> = stream.collect().await;
        assert!(rest.iter().filter(|r| r.is_ok()).count() <= 1);
    }

    #[tokio::test]
    async fn test_ids_with_reserved_characters() {
        let server = start_server_with(Catalog::Memory(MemoryCatalog::with_records([
            CoffeeRecord::new("a?b", "Query"),
            CoffeeRecord::new("a", "Plain"),
            CoffeeRecord::new("a/b#c", "Slash"),
        ])))
        .await;
        let client = &server.client;

        let query = client.get_coffee("a?b").await.unwrap().unwrap();
        assert_eq!((query.id.as_str(), query.name.as_str()), ("a?b", "Query"));
        let slash = client.get_coffee("a/b#c").await.unwrap().unwrap();
        assert_eq!(slash.name, "Slash");
        assert!(matches!(
            client.get_coffee("..").await,
            Err(ClientError::InvalidId(_))
        ));

        let mut stream = Box::pin(client.stream_orders("a?b").await.unwrap());
        for _ in 0..2 {
            let order = timeout(TICK * 5, stream.next())
                .await
                .expect("no order within five intervals")
                .expect("stream ended")
                .unwrap();
            assert_eq!(order.coffee_id, "a?b");
        }
        drop(stream);

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_non_event_stream_reply_is_rejected() {
        let router = Router::new().route(
            "/coffees/{id}/orders",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move { axum::serve(listener, router).await });

        let client = CoffeeClient::new(Url::parse(&format!("http://{addr}")).unwrap());
        match client.stream_orders("A").await {
            Err(ClientError::UnexpectedContentType(content_type)) => {
                assert!(content_type.starts_with("application/json"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("a JSON reply was accepted as an order stream"),
        }

        handle.abort();
    }
}
