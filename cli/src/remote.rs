use std::time::Duration;

use serde_json::Value;

use pantau_core::remote::{
    Action, Envelope, RemoteError, RemoteTransport, RequestBody, parse_envelope,
};

/// HTTP client for the Apps Script web app: one POST endpoint, action and
/// payload in the body.
pub struct AppsScriptClient {
    client: reqwest::Client,
    endpoint: String,
    rt: tokio::runtime::Handle,
}

impl AppsScriptClient {
    pub fn new(endpoint: String, timeout: Duration, rt: tokio::runtime::Handle) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("pantau-cli/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            endpoint,
            rt,
        }
    }

    pub async fn invoke_async(&self, action: Action, data: Value) -> Result<Envelope, RemoteError> {
        if self.endpoint.is_empty() {
            return Err(RemoteError::Transport(
                "no endpoint configured (set endpoint_url in config.json or PANTAU_ENDPOINT)"
                    .to_string(),
            ));
        }

        tracing::debug!(action = action.as_str(), "calling backend");
        let body = RequestBody::new(action, data);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Transport(format!("HTTP status {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        parse_envelope(&text)
    }
}

impl RemoteTransport for AppsScriptClient {
    fn invoke(&self, action: Action, data: Value) -> Result<Envelope, RemoteError> {
        let result = self.rt.block_on(self.invoke_async(action, data));
        if let Err(err) = &result {
            eprintln!("warning: {} request failed: {err}", action.as_str());
        }
        result
    }
}
