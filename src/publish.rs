use anyhow::Result;
use log::info;

use crate::config::Config;
use crate::gateway::GatewayPublisher;
use crate::meter::Metric;
use crate::mqtt::BrokerPublisher;

/// Publishing backend, selected once at construction and never mixed.
/// A failed publish is logged by the caller and dropped, not retried.
pub trait Publisher {
    fn publish(&mut self, metric: Metric, value: f64) -> Result<()>;
}

/// Topic a metric is published to.
pub fn topic_for(metric: Metric) -> String {
    format!("DDS238/0/{}", metric.name())
}

/// Canonical decimal rendering: integral values carry no trailing ".0".
pub fn render_value(value: f64) -> String {
    format!("{}", value)
}

/// A present gateway URL selects the HTTP gateway strategy; otherwise
/// publishes go over a direct broker connection.
pub fn from_config(config: &Config) -> Result<Box<dyn Publisher>> {
    match &config.gateway_url {
        Some(url) => {
            info!("Publishing via HTTP gateway at {}", url);
            Ok(Box::new(GatewayPublisher::new(config, url)?))
        }
        None => {
            info!(
                "Publishing directly to broker at {}:{}",
                config.mqtt_host, config.mqtt_port
            );
            Ok(Box::new(BrokerPublisher::new(config)))
        }
    }
}
