/// One decoded snapshot of the meter. The all-zero reading doubles as the
/// "meter unreachable" sentinel for a cycle with no complete response frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Total energy consumed (kWh)
    pub consumed: f64,
    /// Grid frequency (Hz)
    pub frequency: f64,
    /// RMS voltage (V)
    pub voltage: f64,
    /// RMS current (A)
    pub current: f64,
    /// Active power (W)
    pub power: f64,
    /// Power factor (dimensionless)
    pub power_factor: f64,
}

impl Reading {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Consumed => self.consumed,
            Metric::Frequency => self.frequency,
            Metric::Voltage => self.voltage,
            Metric::Current => self.current,
            Metric::Power => self.power,
            Metric::PowerFactor => self.power_factor,
        }
    }
}

/// The six published measurements, in publish order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Consumed,
    Frequency,
    Voltage,
    Current,
    Power,
    PowerFactor,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Consumed,
        Metric::Frequency,
        Metric::Voltage,
        Metric::Current,
        Metric::Power,
        Metric::PowerFactor,
    ];

    /// Topic leaf name under `DDS238/0/`.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Consumed => "consumed",
            Metric::Frequency => "frequency",
            Metric::Voltage => "voltage",
            Metric::Current => "current",
            Metric::Power => "power",
            Metric::PowerFactor => "powerFactor",
        }
    }
}
