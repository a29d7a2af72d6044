use clap::Parser;

/// Parsed once at startup; immutable for the process lifetime.
#[derive(Parser, Debug)]
#[command(
    name = "dds238mon",
    about = "DDS238 single-phase energy meter to MQTT bridge"
)]
pub struct Config {
    /// HTTP gateway URL; when set, publishes go through the gateway
    /// instead of a direct broker connection
    #[arg(long)]
    pub gateway_url: Option<String>,

    /// MQTT client ID
    #[arg(long, default_value = "DDS238d")]
    pub mqtt_client_id: String,

    /// MQTT broker hostname
    #[arg(long, default_value = "127.0.0.1")]
    pub mqtt_host: String,

    /// MQTT broker port
    #[arg(long, default_value_t = 1883)]
    pub mqtt_port: u16,

    /// MQTT username (also used for gateway basic auth)
    #[arg(long, default_value = "dds238")]
    pub mqtt_user: String,

    /// MQTT password (also used for gateway basic auth)
    #[arg(long, default_value = "password")]
    pub mqtt_pass: String,

    /// Serial device the meter is attached to
    #[arg(long, default_value = "/dev/ttyUSB0")]
    pub device: String,
}
