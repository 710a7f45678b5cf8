//! HTTP client for the storefront orders endpoint.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rootcraft::orders::{NewOrder, OrderCreated, OrdersApi, OrdersApiError, error_message};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

/// Configuration for the orders client.
#[derive(Clone)]
pub struct HttpOrdersConfig {
    /// Full URL of the order-creation endpoint, e.g. `"https://api.example.com/api/orders"`.
    pub url: String,

    /// Bearer token of the signed-in customer.
    pub token: Option<String>,
}

impl fmt::Debug for HttpOrdersConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpOrdersConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Creates orders over HTTP.
pub struct HttpOrdersClient {
    url: String,
    token: Option<Zeroizing<String>>,
    http: Client,
}

impl HttpOrdersClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: HttpOrdersConfig) -> Self {
        Self {
            url: config.url,
            token: config.token.map(Zeroizing::new),
            http: Client::new(),
        }
    }
}

impl fmt::Debug for HttpOrdersClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpOrdersClient")
            .field("url", &self.url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrdersApi for HttpOrdersClient {
    async fn create_order(&self, order: NewOrder) -> Result<OrderCreated, OrdersApiError> {
        let mut request = self.http.post(&self.url).json(&order);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        debug!(%status, url = %self.url, "order endpoint responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(OrdersApiError::Unauthorized);
        }

        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(OrdersApiError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: Value = serde_json::from_str(&body).map_err(transport)?;

        OrderCreated::from_body(&parsed)
    }
}

fn transport(error: impl std::error::Error + Send + Sync + 'static) -> OrdersApiError {
    OrdersApiError::Transport(Box::new(error))
}

#[cfg(test)]
mod tests {
    use std::io;

    use rootcraft::{
        checkout::forms::AddressForm,
        items::CartItem,
        orders::PaymentMethod,
        pricing::{OrderTotals, ThresholdShipping},
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    use super::*;

    fn order() -> NewOrder {
        let items = [CartItem {
            id: "p1".to_string(),
            name: "Oak Chair".to_string(),
            description: String::new(),
            image: "/chair.png".to_string(),
            price: Decimal::from(1_000),
            old_price: None,
            quantity: 2,
            tag: None,
        }];

        let address = AddressForm {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip: "560001".to_string(),
            ..AddressForm::default()
        };

        let totals = OrderTotals::for_items(&items, &ThresholdShipping::default());

        NewOrder::new(&items, &address, PaymentMethod::CashOnDelivery, totals)
    }

    /// Accept one connection, answer it with a canned response and hand back the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> io::Result<(String, JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/api/orders", listener.local_addr()?);

        let handle = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return String::new();
            };

            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );

            if socket.write_all(response.as_bytes()).await.is_ok() {
                socket.shutdown().await.ok();
            }

            request
        });

        Ok((url, handle))
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 4096];

        loop {
            let read = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(read) => read,
            };

            buffer.extend(chunk.iter().take(read));

            let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };

            let headers = String::from_utf8_lossy(buffer.get(..end).unwrap_or_default())
                .to_ascii_lowercase();

            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            if buffer.len() >= end + 4 + length {
                break;
            }
        }

        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn client(url: String, token: Option<&str>) -> HttpOrdersClient {
        HttpOrdersClient::new(HttpOrdersConfig {
            url,
            token: token.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn created_order_returns_id() -> TestResult {
        let (url, server) = serve_once("201 Created", r#"{"_id":"665f0c2a","isPaid":false}"#).await?;

        let created = client(url, Some("tok_123")).create_order(order()).await?;
        let request = server.await?;

        assert_eq!(created.id, "665f0c2a");
        assert!(request.starts_with("POST /api/orders"), "{request}");
        assert!(
            request.to_ascii_lowercase().contains("authorization: bearer tok_123"),
            "{request}"
        );
        assert!(
            request.contains(r#""paymentMethod":"Cash on Delivery""#),
            "{request}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_unauthorized() -> TestResult {
        let (url, server) = serve_once("401 Unauthorized", r#"{"message":"Not authorized"}"#).await?;

        let result = client(url, None).create_order(order()).await;
        server.await?;

        assert!(
            matches!(result, Err(OrdersApiError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejection_carries_backend_message() -> TestResult {
        let (url, server) = serve_once("400 Bad Request", r#"{"message":"No order items"}"#).await?;

        let result = client(url, None).create_order(order()).await;
        server.await?;

        assert!(
            matches!(
                &result,
                Err(OrdersApiError::Rejected { status: 400, message: Some(message) })
                    if message == "No order items"
            ),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn success_without_id_is_an_error() -> TestResult {
        let (url, server) = serve_once("200 OK", r#"{"ok":true}"#).await?;

        let result = client(url, None).create_order(order()).await;
        server.await?;

        assert!(
            matches!(result, Err(OrdersApiError::MissingOrderId)),
            "expected MissingOrderId, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() -> TestResult {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/api/orders", listener.local_addr()?);
        drop(listener);

        let result = client(url, None).create_order(order()).await;

        assert!(
            matches!(result, Err(OrdersApiError::Transport(_))),
            "expected Transport, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn debug_output_hides_token() {
        let config = HttpOrdersConfig {
            url: "http://localhost".to_string(),
            token: Some("secret".to_string()),
        };

        assert!(!format!("{config:?}").contains("secret"));
        assert!(!format!("{:?}", HttpOrdersClient::new(config)).contains("secret"));
    }
}
