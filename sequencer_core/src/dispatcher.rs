use crate::error::DispatchError;
use crate::message::{Message, TelemetryChannel};
use crate::numeric::{parse_decimal_prefix, parse_integer_prefix};

/// Millivolts as reported by the voltage channel.
pub type Millivolts = i32;
/// Degrees Celsius as reported by the temperature channel.
pub type Celsius = f64;

/// Typed sample extracted from a telemetry message.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleUpdate {
    Voltage(Millivolts),
    Temperature(Celsius),
}

impl SampleUpdate {
    pub fn channel(&self) -> TelemetryChannel {
        match self {
            SampleUpdate::Voltage(_) => TelemetryChannel::Voltage,
            SampleUpdate::Temperature(_) => TelemetryChannel::Temperature,
        }
    }
}

/// Classifies `message` by its tag byte and parses the payload.
///
/// Payloads are parsed leniently: a payload without a numeric prefix yields
/// `0` / `0.0` rather than an error. Only an unknown tag is reported.
pub fn dispatch(message: &Message) -> Result<SampleUpdate, DispatchError> {
    match TelemetryChannel::try_from(message.tag()) {
        Ok(TelemetryChannel::Voltage) => Ok(SampleUpdate::Voltage(parse_integer_prefix(
            message.payload(),
        ))),
        Ok(TelemetryChannel::Temperature) => Ok(SampleUpdate::Temperature(parse_decimal_prefix(
            message.payload(),
        ))),
        Err(tag) => Err(DispatchError::UnknownTag(tag)),
    }
}
