use crate::meter::Reading;

/// Fixed request frame: device address 1, read holding registers,
/// start register 0x0008, register count 0x000A, trailing CRC.
pub const REQUEST_FRAME: [u8; 8] = [0x01, 0x03, 0x00, 0x08, 0x00, 0x0a, 0x44, 0x0f];

/// Length of a complete response: 3-byte address/function/length prefix
/// plus the register payload.
pub const RESPONSE_LEN: usize = 25;

/// 16-bit register at logical offset `pos`, big-endian. The +3 shift skips
/// the response prefix before the payload registers begin.
fn word(frame: &[u8], pos: usize) -> u32 {
    u32::from(frame[pos + 3]) * 256 + u32::from(frame[pos + 4])
}

/// 32-bit register pair at logical offset `pos`, high word first.
fn double_word(frame: &[u8], pos: usize) -> u32 {
    word(frame, pos) * 65536 + word(frame, pos + 2)
}

/// Decode a response frame into a Reading. Anything other than a complete
/// 25-byte frame yields the all-zero Reading: the meter is treated as
/// unreachable for this cycle, not as an error.
pub fn decode(frame: &[u8]) -> Reading {
    if frame.len() != RESPONSE_LEN {
        return Reading::default();
    }

    Reading {
        consumed: f64::from(double_word(frame, 4)) / 100.0,
        frequency: f64::from(word(frame, 18)) / 100.0,
        voltage: f64::from(word(frame, 8)) / 10.0,
        current: f64::from(word(frame, 10)) / 100.0,
        power: f64::from(word(frame, 12)),
        power_factor: f64::from(word(frame, 16)) / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 25-byte response with the given 16-bit registers placed at
    /// their logical offsets.
    fn frame_with(fields: &[(usize, u16)]) -> Vec<u8> {
        let mut frame = vec![0u8; RESPONSE_LEN];
        frame[0] = 0x01;
        frame[1] = 0x03;
        frame[2] = 0x14;
        for &(pos, value) in fields {
            frame[pos + 3] = (value >> 8) as u8;
            frame[pos + 4] = (value & 0xff) as u8;
        }
        frame
    }

    #[test]
    fn decode_voltage() {
        let frame = frame_with(&[(8, 2300)]);
        let reading = decode(&frame);
        assert!((reading.voltage - 230.0).abs() < 0.001);
    }

    #[test]
    fn decode_consumed_double_word() {
        // 123456 = 0x0001_E240 split across two registers
        let frame = frame_with(&[(4, 0x0001), (6, 0xE240)]);
        let reading = decode(&frame);
        assert!((reading.consumed - 1234.56).abs() < 0.001);
    }

    #[test]
    fn decode_full_frame() {
        let frame = frame_with(&[
            (4, 0x0001),
            (6, 0xE240), // consumed raw 123456
            (8, 2313),   // voltage 231.3 V
            (10, 98),    // current 0.98 A
            (12, 105),   // power 105 W
            (16, 950),   // power factor 0.950
            (18, 5003),  // frequency 50.03 Hz
        ]);
        let reading = decode(&frame);
        assert!((reading.consumed - 1234.56).abs() < 0.001);
        assert!((reading.voltage - 231.3).abs() < 0.01);
        assert!((reading.current - 0.98).abs() < 0.001);
        assert!((reading.power - 105.0).abs() < 0.001);
        assert!((reading.power_factor - 0.95).abs() < 0.0001);
        assert!((reading.frequency - 50.03).abs() < 0.001);
    }

    #[test]
    fn decode_is_deterministic() {
        let frame = frame_with(&[(8, 2300), (12, 105)]);
        assert_eq!(decode(&frame), decode(&frame));
    }

    #[test]
    fn short_frame_yields_zero_reading() {
        assert_eq!(decode(&[]), Reading::default());
        assert_eq!(decode(&[0u8; 24]), Reading::default());
    }

    #[test]
    fn long_frame_yields_zero_reading() {
        assert_eq!(decode(&[0u8; 26]), Reading::default());
    }
}
