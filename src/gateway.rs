use anyhow::{bail, Context, Result};
use log::debug;
use serde::Serialize;

use crate::config::Config;
use crate::meter::Metric;
use crate::publish::{render_value, topic_for, Publisher};

/// Body of one gateway POST: the topic the gateway should publish to and
/// the rendered value.
#[derive(Serialize)]
struct GatewayMessage {
    topic: String,
    payload: String,
}

/// Gateway strategy: one synchronous POST per changed metric to an HTTP
/// endpoint fronting the broker. No persistent connection, so no
/// reconnect machinery; a failed request is the caller's to log and drop.
pub struct GatewayPublisher {
    url: String,
    username: String,
    password: String,
    client: reqwest::blocking::Client,
}

impl GatewayPublisher {
    pub fn new(config: &Config, url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(GatewayPublisher {
            url: url.to_string(),
            username: config.mqtt_user.clone(),
            password: config.mqtt_pass.clone(),
            client,
        })
    }
}

impl Publisher for GatewayPublisher {
    fn publish(&mut self, metric: Metric, value: f64) -> Result<()> {
        let body = GatewayMessage {
            topic: topic_for(metric),
            payload: render_value(value),
        };

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .with_context(|| format!("Failed to reach gateway at {}", self.url))?;

        if !response.status().is_success() {
            bail!("Gateway returned {} for {}", response.status(), body.topic);
        }

        debug!("Posted {} = {} to gateway", body.topic, body.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_topic_and_payload() {
        let body = GatewayMessage {
            topic: topic_for(Metric::Power),
            payload: render_value(105.0),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"topic":"DDS238/0/power","payload":"105"}"#
        );
    }

    #[test]
    fn fractional_payloads_keep_their_precision() {
        let body = GatewayMessage {
            topic: topic_for(Metric::PowerFactor),
            payload: render_value(0.95),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"topic":"DDS238/0/powerFactor","payload":"0.95"}"#
        );
    }
}
