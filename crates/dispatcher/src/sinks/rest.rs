//! RestSink - JSON POST to the project endpoint

use contracts::{ContractError, DeliveryConfig, GathererSettings, RecordSink, StatusRecord};
use tracing::{debug, instrument};

/// Sink that posts each record as a JSON object
pub struct RestSink {
    name: String,
    endpoint: String,
    url: reqwest::Url,
    client: reqwest::Client,
}

impl RestSink {
    /// Create a new RestSink targeting `endpoint`
    pub fn new(
        name: impl Into<String>,
        endpoint: &str,
        delivery: &DeliveryConfig,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let endpoint = endpoint.trim().to_string();

        let url = reqwest::Url::parse(&endpoint).map_err(|e| {
            ContractError::sink_connection(&name, format!("invalid endpoint '{endpoint}': {e}"))
        })?;

        let client = reqwest::Client::builder()
            .timeout(delivery.timeout())
            .user_agent(delivery.user_agent.as_str())
            .build()
            .map_err(|e| ContractError::sink_connection(&name, e.to_string()))?;

        Ok(Self {
            name,
            endpoint,
            url,
            client,
        })
    }

    /// Create from settings (for builder)
    pub fn from_settings(
        name: impl Into<String>,
        settings: &GathererSettings,
    ) -> Result<Self, ContractError> {
        Self::new(name, &settings.project_endpoint, &settings.delivery)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSink for RestSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &str {
        &self.endpoint
    }

    #[instrument(
        name = "rest_sink_send",
        skip(self, record),
        fields(sink = %self.name, endpoint = %self.endpoint, item = %record.item_name)
    )]
    async fn send(&self, record: &StatusRecord) -> Result<(), ContractError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| {
                ContractError::sink_connection(
                    &self.name,
                    format!("POST {} failed: {e}", self.endpoint),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::sink_write(
                &self.name,
                format!("POST {} returned HTTP {}", self.endpoint, status.as_u16()),
            ));
        }

        debug!(sink = %self.name, status = status.as_u16(), "Record posted");
        Ok(())
    }
}
