//! HTTP transport for the configuration API
//!
//! Thin wrapper around a pooled `reqwest::Client` that attaches the
//! `Api-Token` authorization header and hands back the status and raw body of
//! every response. Status interpretation is left to the caller.

use std::time::Duration;

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, multipart};

use super::error::{SyncError, SyncResult};

/// Status and body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub method: &'static str,
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx response into [`SyncError::Http`]
    pub fn error_for_status(self) -> SyncResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SyncError::Http {
                method: self.method,
                url: self.url.clone(),
                status: self.status,
                body: self.body_text(),
            })
        }
    }
}

/// Authenticated transport scoped to one API token
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    authorization: HeaderValue,
    request_logging: bool,
}

impl HttpTransport {
    pub fn new(
        token: &str,
        timeout: Duration,
        user_agent: &str,
        request_logging: bool,
    ) -> SyncResult<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Api-Token {}", token))
            .map_err(SyncError::InvalidToken)?;
        authorization.set_sensitive(true);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(HttpTransport {
            client,
            authorization,
            request_logging,
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, self.authorization.clone())
    }

    pub async fn get(&self, url: &str) -> SyncResult<TransportResponse> {
        self.send("GET", url, self.request(Method::GET, url)).await
    }

    pub async fn post_json(&self, url: &str, body: &str) -> SyncResult<TransportResponse> {
        let builder = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());
        self.send("POST", url, builder).await
    }

    pub async fn put_json(&self, url: &str, body: &str) -> SyncResult<TransportResponse> {
        let builder = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());
        self.send("PUT", url, builder).await
    }

    pub async fn delete(&self, url: &str) -> SyncResult<TransportResponse> {
        self.send("DELETE", url, self.request(Method::DELETE, url))
            .await
    }

    /// POST a single file as `multipart/form-data`
    pub async fn post_multipart(
        &self,
        url: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        contents: Vec<u8>,
    ) -> SyncResult<TransportResponse> {
        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str(mime)?;
        let form = multipart::Form::new().part(field.to_owned(), part);
        let builder = self.request(Method::POST, url).multipart(form);
        self.send("POST", url, builder).await
    }

    async fn send(
        &self,
        method: &'static str,
        url: &str,
        builder: RequestBuilder,
    ) -> SyncResult<TransportResponse> {
        if self.request_logging {
            debug!("{} {}", method, url);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        if self.request_logging {
            debug!("{} {} -> HTTP {} ({} bytes)", method, url, status, body.len());
        }

        Ok(TransportResponse {
            method,
            url: url.to_owned(),
            status,
            body,
        })
    }
}
