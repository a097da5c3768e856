use futures_util::{Stream, StreamExt, stream};
use reqwest::{Client, StatusCode, header};
use url::Url;

use super::{ClientError, ensure_success, parse_response};
use crate::objects::{Coffee, CoffeeOrder};
use crate::sse::SseDecoder;

/// Typed HTTP client for the catalog and order stream endpoints.
#[derive(Debug, Clone)]
pub struct CoffeeClient {
    http: Client,
    base_url: Url,
}

impl CoffeeClient {
    /// Create a new `CoffeeClient` rooted at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /coffees` – every catalog entry.
    pub async fn list_coffees(&self) -> Result<Vec<Coffee>, ClientError> {
        let url = self.base_url.join("/coffees")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /coffees/{id}` – a single entry, `None` when the server answers 404.
    pub async fn get_coffee(&self, id: &str) -> Result<Option<Coffee>, ClientError> {
        let url = self.base_url.join(&coffee_path(id, "")?)?;
        let resp = self.http.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_response(resp).await.map(Some)
    }

    /// `GET /coffees/{id}/orders` – open the order event stream.
    ///
    /// The returned stream never ends on its own; drop it to disconnect.
    /// Keep-alive comments are skipped, and each `data:` payload is decoded
    /// as a [`CoffeeOrder`].
    pub async fn stream_orders(
        &self,
        coffee_id: &str,
    ) -> Result<impl Stream<Item = Result<CoffeeOrder, ClientError>> + Send + 'static, ClientError>
    {
        let url = self.base_url.join(&coffee_path(coffee_id, "/orders")?)?;
        let resp = self
            .http
            .get(url)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        ensure_event_stream(&resp)?;

        let mut decoder = SseDecoder::new();
        let orders = resp.bytes_stream().flat_map(move |chunk| {
            let items: Vec<Result<CoffeeOrder, ClientError>> = match chunk {
                Ok(bytes) => decoder
                    .feed(&bytes)
                    .into_iter()
                    .map(|event| serde_json::from_str(&event.data).map_err(ClientError::Json))
                    .collect(),
                Err(e) => vec![Err(ClientError::Http(e))],
            };
            stream::iter(items)
        });
        Ok(orders)
    }
}

/// `/coffees/{id}{suffix}` with `id` escaped as one path segment.
///
/// `.` and `..` survive escaping and would be collapsed by URL
/// normalization, so they are rejected along with the empty id.
fn coffee_path(id: &str, suffix: &str) -> Result<String, ClientError> {
    if matches!(id, "" | "." | "..") {
        return Err(ClientError::InvalidId(id.to_owned()));
    }
    Ok(format!("/coffees/{}{suffix}", urlencoding::encode(id)))
}

fn ensure_event_stream(resp: &reqwest::Response) -> Result<(), ClientError> {
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    if mime.eq_ignore_ascii_case("text/event-stream") {
        Ok(())
    } else {
        Err(ClientError::UnexpectedContentType(content_type.to_owned()))
    }
}
