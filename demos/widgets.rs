//! Drives the caching client against an in-process fake origin and logs the
//! hit / revalidate / recover flow.
//!
//! Run with:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example widgets
//! ```

use std::sync::{Arc, Mutex};

use etag_cache::{Client, Request, Response, StatusCode, TransportError};
use serde_json::json;

/// A fake origin that answers `GET /widgets` with an ETag and a short
/// freshness window, and honors `If-None-Match` with a 304.
struct Origin {
    hits: Mutex<u32>,
}

impl Origin {
    fn transport(origin: &Arc<Self>) -> impl etag_cache::Transport + use<> {
        let origin = Arc::clone(origin);
        move |request: Request| {
            let origin = Arc::clone(&origin);
            async move {
                *origin.hits.lock().unwrap() += 1;
                if request.headers().get("If-None-Match") == Some("\"w1\"") {
                    return Err(TransportError::Status {
                        response: Response::new(StatusCode::NotModified, request)
                            .header("etag", "\"w1\""),
                    });
                }
                Ok(Response::new(StatusCode::Ok, request)
                    .header("etag", "\"w1\"")
                    .header("cache-control", "max-age=2")
                    .with_data(json!({"id": 1, "name": "widget"})))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), TransportError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let origin = Arc::new(Origin {
        hits: Mutex::new(0),
    });
    let client = Client::new(Origin::transport(&origin));

    let first = client.get("https://origin.test/widgets").await?;
    println!("first:  {} {:?}", first.status(), first.data());

    let cached = client.get("https://origin.test/widgets").await?;
    println!("cached: {} ({})", cached.status(), cached.status_line());

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    let revalidated = client.get("https://origin.test/widgets").await?;
    println!(
        "after expiry: {} {:?}",
        revalidated.status(),
        revalidated.data()
    );

    println!("origin hits: {}", origin.hits.lock().unwrap());
    Ok(())
}
