//! Pieces of the standalone voltage and temperature reporters that do not
//! touch hardware.
use core::fmt::Write;

use crate::config::{MESSAGE_SIZE, OVER_TEMPERATURE_LIMIT};
use crate::dispatcher::{Celsius, Millivolts};

pub type ReportLine = heapless::String<MESSAGE_SIZE>;

/// `"<millivolts>\n"`, the line format the sequencer's voltage channel expects.
pub fn format_voltage_line(voltage: Millivolts) -> Result<ReportLine, core::fmt::Error> {
    let mut line = ReportLine::new();
    writeln!(line, "{}", voltage)?;
    Ok(line)
}

/// `"<degrees with six decimals>\n"` for the temperature channel.
pub fn format_temperature_line(temperature: Celsius) -> Result<ReportLine, core::fmt::Error> {
    let mut line = ReportLine::new();
    writeln!(line, "{:.6}", temperature)?;
    Ok(line)
}

const SAMPLE_WIDTH: usize = core::mem::size_of::<Millivolts>();

/// Rebuilds voltage samples from the binary stream of a voltage monitor, which
/// sends every sample as four big-endian bytes.
#[derive(Debug, Default)]
pub struct SampleAssembler {
    shift_register: u32,
    received: usize,
}

impl SampleAssembler {
    pub const fn new() -> Self {
        Self {
            shift_register: 0,
            received: 0,
        }
    }

    /// Returns a sample once every [`SAMPLE_WIDTH`] bytes.
    pub fn push(&mut self, byte: u8) -> Option<Millivolts> {
        self.shift_register = (self.shift_register << 8) | byte as u32;
        self.received += 1;
        if self.received >= SAMPLE_WIDTH {
            self.received = 0;
            Some(self.shift_register as Millivolts)
        } else {
            None
        }
    }
}

/// Blinking activity LED that stays lit while the temperature is too high.
#[derive(Debug)]
pub struct Heartbeat {
    lit: bool,
    over_temperature: Celsius,
}

impl Heartbeat {
    pub const fn new(over_temperature: Celsius) -> Self {
        Self {
            lit: false,
            over_temperature,
        }
    }

    /// Advances the blink phase and returns the LED level for this period.
    pub fn next_level(&mut self, temperature: Celsius) -> bool {
        self.lit = !self.lit;
        self.lit || temperature >= self.over_temperature
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new(OVER_TEMPERATURE_LIMIT)
    }
}

const ADC_REFERENCE_VOLTS: f64 = 3.3;
const ADC_FULL_SCALE: f64 = 4096.0;

/// Converts a 12-bit reading of the RP2040 on-die temperature sensor to °C.
pub fn rp2040_temperature_celsius(raw: u16) -> Celsius {
    let volts = raw as f64 * ADC_REFERENCE_VOLTS / ADC_FULL_SCALE;
    27.0 - (volts - 0.706) / 0.001721
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{parse_decimal_prefix, parse_integer_prefix};

    #[test]
    fn test_voltage_line() {
        assert_eq!(format_voltage_line(2500).unwrap().as_str(), "2500\n");
        assert_eq!(format_voltage_line(-12).unwrap().as_str(), "-12\n");
        assert_eq!(
            format_voltage_line(i32::MIN).unwrap().as_str(),
            "-2147483648\n"
        );
    }

    #[test]
    fn test_temperature_line() {
        assert_eq!(format_temperature_line(12.5).unwrap().as_str(), "12.500000\n");
        assert_eq!(format_temperature_line(-4.25).unwrap().as_str(), "-4.250000\n");
    }

    #[test]
    fn test_temperature_line_too_long_is_rejected() {
        assert!(format_temperature_line(f64::MAX).is_err());
    }

    #[test]
    fn test_report_lines_parse_back_on_the_sequencer_side() {
        let line = format_voltage_line(2048).unwrap();
        assert_eq!(parse_integer_prefix(line.trim_end().as_bytes()), 2048);

        let line = format_temperature_line(23.75).unwrap();
        assert_eq!(parse_decimal_prefix(line.trim_end().as_bytes()), 23.75);
    }

    #[test]
    fn test_sample_assembler_big_endian() {
        let mut assembler = SampleAssembler::new();
        assert_eq!(assembler.push(0x00), None);
        assert_eq!(assembler.push(0x00), None);
        assert_eq!(assembler.push(0x09), None);
        assert_eq!(assembler.push(0xC4), Some(2500));

        for b in (-1i32).to_be_bytes() {
            if let Some(sample) = assembler.push(b) {
                assert_eq!(sample, -1);
            }
        }
    }

    #[test]
    fn test_sample_assembler_emits_every_fourth_byte() {
        let mut assembler = SampleAssembler::new();
        let samples = [1u8, 2, 3, 4, 5, 6, 7, 8, 9]
            .iter()
            .filter_map(|&b| assembler.push(b))
            .count();
        assert_eq!(samples, 2);
    }

    #[test]
    fn test_heartbeat_blinks() {
        let mut heartbeat = Heartbeat::default();
        let levels = [
            heartbeat.next_level(20.0),
            heartbeat.next_level(20.0),
            heartbeat.next_level(20.0),
            heartbeat.next_level(20.0),
        ];
        assert_eq!(levels, [true, false, true, false]);
    }

    #[test]
    fn test_heartbeat_stays_on_when_hot() {
        let mut heartbeat = Heartbeat::new(40.0);
        assert!(heartbeat.next_level(40.0));
        assert!(heartbeat.next_level(40.0));
        assert!(heartbeat.next_level(55.0));
        assert!(!heartbeat.next_level(39.9));
    }

    #[test]
    fn test_rp2040_sensor_conversion() {
        // 0.706 V on the sensor is 27 °C
        let raw = (0.706 * ADC_FULL_SCALE / ADC_REFERENCE_VOLTS) as u16;
        let celsius = rp2040_temperature_celsius(raw);
        assert!((celsius - 27.0).abs() < 1.0);

        // Higher voltage means colder die
        assert!(rp2040_temperature_celsius(raw + 20) < celsius);
    }
}
