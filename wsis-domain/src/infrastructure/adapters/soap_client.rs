use super::soap_envelope::{parse_response, SoapCall, SoapResponse};
use super::wsdl_cache::WsdlCache;
use crate::application::ports::SoapOptions;
use crate::domain::errors::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};
use uuid::Uuid;

/// One request/response pair, kept when call tracing is enabled.
///
/// `request` is the envelope with sensitive parameters masked; credentials
/// sent in the `Authorization` header are never recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapExchange {
    pub call_id: Uuid,
    pub operation: &'static str,
    pub started_at: DateTime<Utc>,
    pub request: String,
    pub status: Option<u16>,
    pub response: Option<String>,
}

/// SOAP 1.1 client bound to a single service endpoint
pub struct SoapClient {
    endpoint: String,
    http: reqwest::Client,
    username: String,
    password: Option<String>,
    options: SoapOptions,
    last_exchange: Mutex<Option<SoapExchange>>,
}

impl SoapClient {
    pub fn new(
        endpoint: impl Into<String>,
        http: reqwest::Client,
        username: impl Into<String>,
        password: Option<String>,
        options: SoapOptions,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
            username: username.into(),
            password,
            options,
            last_exchange: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Last traced request/response, if tracing is enabled
    pub fn last_exchange(&self) -> Option<SoapExchange> {
        self.last_exchange.lock().ok().and_then(|last| last.clone())
    }

    fn record(&self, exchange: SoapExchange) {
        if !self.options.trace {
            return;
        }
        trace!(
            call_id = %exchange.call_id,
            operation = exchange.operation,
            request = %exchange.request,
            response = ?exchange.response,
            "SOAP exchange"
        );
        if let Ok(mut last) = self.last_exchange.lock() {
            *last = Some(exchange);
        }
    }

    /// Fetch this endpoint's service description through `cache`
    pub async fn service_description(&self, cache: &WsdlCache) -> ServiceResult<Arc<str>> {
        cache
            .load(&self.endpoint, || self.fetch_service_description())
            .await
    }

    async fn fetch_service_description(&self) -> ServiceResult<String> {
        let url = format!("{}?wsdl", self.endpoint);
        debug!(url = %url, "fetching service description");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, self.password.as_ref())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Send one operation and decode its response
    pub async fn call(&self, call: &SoapCall) -> ServiceResult<SoapResponse> {
        let call_id = Uuid::new_v4();
        let envelope = call.to_envelope();
        let mut exchange = SoapExchange {
            call_id,
            operation: call.operation(),
            started_at: Utc::now(),
            request: call.to_redacted_envelope(&self.options.sensitive_fields),
            status: None,
            response: None,
        };

        debug!(
            %call_id,
            operation = call.operation(),
            endpoint = %self.endpoint,
            "sending SOAP request"
        );

        let sent = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.username, self.password.as_ref())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", call.soap_action()))
            .body(envelope)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                self.record(exchange);
                return Err(e.into());
            }
        };

        let status = response.status();
        exchange.status = Some(status.as_u16());

        if call.is_one_way() && !self.options.wait_one_way_calls {
            self.record(exchange);
            return Ok(SoapResponse::default());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                self.record(exchange);
                return Err(e.into());
            }
        };
        exchange.response = Some(body.clone());
        self.record(exchange);

        decode(call, status, &body)
    }
}

fn decode(call: &SoapCall, status: reqwest::StatusCode, body: &str) -> ServiceResult<SoapResponse> {
    if body.trim().is_empty() {
        return if !status.is_success() {
            Err(ServiceError::Http {
                status: status.as_u16(),
                body: String::new(),
            })
        } else if call.is_one_way() {
            // Axis2 answers in-only operations with 202 and no body
            Ok(SoapResponse::default())
        } else {
            Err(ServiceError::malformed(format!(
                "empty response to {}",
                call.operation()
            )))
        };
    }

    match parse_response(body) {
        Err(fault @ ServiceError::Fault { .. }) => Err(fault),
        _ if !status.is_success() => Err(ServiceError::Http {
            status: status.as_u16(),
            body: body.to_string(),
        }),
        other => other,
    }
}
