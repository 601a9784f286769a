use crate::domain::model::{HttpMethod, HttpRequest, HttpResponse, ResponseBody};
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(Method::from(request.method), &request.url)
            .timeout(Duration::from_millis(request.timeout_ms));

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!("📡 {} {}", request.method, request.url);
        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        tracing::debug!("📡 Response status: {}", response.status());

        let text = response.text().await?;
        Ok(HttpResponse {
            status_code,
            body: ResponseBody::from_text(text),
        })
    }
}
