use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::meter::Metric;
use crate::publish::{render_value, topic_for, Publisher};

const KEEP_ALIVE: Duration = Duration::from_secs(15);

const FIRST_RECONNECT_DELAY: Duration = Duration::from_secs(1);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);
const MAX_RECONNECT_ATTEMPTS: u32 = 12;

/// Backoff schedule for one disconnect episode: delays double from 1s,
/// cap at 60s, and the episode is abandoned after 12 failed attempts.
struct ReconnectState {
    attempts: u32,
    delay: Duration,
}

impl ReconnectState {
    fn new() -> Self {
        ReconnectState {
            attempts: 0,
            delay: FIRST_RECONNECT_DELAY,
        }
    }

    /// Delay to sleep before the next reconnect attempt, or None once the
    /// episode is exhausted.
    fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= MAX_RECONNECT_ATTEMPTS {
            return None;
        }
        let delay = self.delay;
        self.attempts += 1;
        self.delay = (self.delay * 2).min(MAX_RECONNECT_DELAY);
        Some(delay)
    }
}

/// Connection status shared between the network thread, which observes
/// connect/disconnect events, and the polling thread, which checks it
/// before queueing a publish. Explicitly injected; no global handlers.
#[derive(Default)]
struct ConnectionMonitor {
    connected: AtomicBool,
}

impl ConnectionMonitor {
    fn on_connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Returns true when this marks a fresh loss of an established
    /// connection, as opposed to another failure while already down.
    fn on_disconnect(&self) -> bool {
        self.connected.swap(false, Ordering::SeqCst)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Direct-broker strategy: a long-lived rumqttc client whose event loop
/// runs on a background thread. Publishes are fire-and-forget at QoS 0.
pub struct BrokerPublisher {
    client: Client,
    monitor: Arc<ConnectionMonitor>,
}

impl BrokerPublisher {
    pub fn new(config: &Config) -> Self {
        let mut opts = MqttOptions::new(
            &config.mqtt_client_id,
            &config.mqtt_host,
            config.mqtt_port,
        );
        opts.set_credentials(&config.mqtt_user, &config.mqtt_pass);
        opts.set_keep_alive(KEEP_ALIVE);

        let (client, connection) = Client::new(opts, 10);

        let monitor = Arc::new(ConnectionMonitor::default());
        let thread_monitor = Arc::clone(&monitor);
        thread::spawn(move || network_loop(connection, thread_monitor));

        BrokerPublisher { client, monitor }
    }
}

impl Publisher for BrokerPublisher {
    fn publish(&mut self, metric: Metric, value: f64) -> Result<()> {
        if !self.monitor.is_connected() {
            bail!("Not connected to MQTT broker");
        }

        // try_publish keeps the polling thread from blocking on a full
        // request queue while the network thread is sleeping in backoff.
        self.client
            .try_publish(topic_for(metric), QoS::AtMostOnce, false, render_value(value))
            .with_context(|| format!("Failed to queue publish for {}", metric.name()))?;
        Ok(())
    }
}

impl Drop for BrokerPublisher {
    fn drop(&mut self) {
        self.client.disconnect().ok();
    }
}

/// Drives the broker event loop: keepalive, inbound dispatch, and the
/// reconnect backoff for the current disconnect episode. Backoff sleeps
/// stall this thread only; the polling thread keeps cycling and its
/// publishes fail until the connection is back.
fn network_loop(mut connection: Connection, monitor: Arc<ConnectionMonitor>) {
    let mut reconnect = ReconnectState::new();

    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!("Connected to MQTT broker ({:?})", ack.code);
                monitor.on_connect();
                reconnect = ReconnectState::new();
            }
            Ok(event) => {
                debug!("MQTT event: {:?}", event);
            }
            Err(e) => {
                if monitor.on_disconnect() {
                    info!("Disconnected from MQTT broker: {}", e);
                    reconnect = ReconnectState::new();
                }

                match reconnect.next_delay() {
                    Some(delay) => {
                        warn!(
                            "Reconnect attempt {} in {}s ({})",
                            reconnect.attempts,
                            delay.as_secs(),
                            e
                        );
                        thread::sleep(delay);
                    }
                    None => {
                        error!(
                            "Reconnect failed after {} attempts, giving up",
                            MAX_RECONNECT_ATTEMPTS
                        );
                        break;
                    }
                }
            }
        }
    }
}
