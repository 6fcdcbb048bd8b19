//! Lenient number parsing for telemetry payloads.
//!
//! Both parsers read the longest numeric prefix of the input and ignore the
//! rest. Input without any numeric prefix yields zero instead of an error, so
//! a garbled temperature line reads as 0.0° and a garbled voltage line as 0 mV.

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn skip_space(input: &[u8]) -> &[u8] {
    let start = input.iter().position(|&b| !is_space(b)).unwrap_or(input.len());
    &input[start..]
}

fn count_digits(input: &[u8]) -> usize {
    input.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parses a base-10 integer prefix. Values outside the `i32` range saturate.
pub fn parse_integer_prefix(input: &[u8]) -> i32 {
    let input = skip_space(input);
    let (negative, digits) = match input.first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let mut value: i32 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = (b - b'0') as i32;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Length of the decimal number at the start of `input` (sign included), or 0.
fn decimal_prefix_len(input: &[u8]) -> usize {
    let mut pos = match input.first() {
        Some(b'-') | Some(b'+') => 1,
        _ => 0,
    };

    let int_digits = count_digits(&input[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if input.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&input[pos + 1..]);
        if int_digits + frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return 0;
    }

    // The exponent only counts when at least one digit follows it
    if matches!(input.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(input.get(exp_pos), Some(b'-') | Some(b'+')) {
            exp_pos += 1;
        }
        let exp_digits = count_digits(&input[exp_pos.min(input.len())..]);
        if exp_digits > 0 {
            pos = exp_pos + exp_digits;
        }
    }

    pos
}

fn starts_with_ignore_case(input: &[u8], word: &[u8]) -> bool {
    input.len() >= word.len() && input[..word.len()].eq_ignore_ascii_case(word)
}

/// Parses a decimal number prefix (`[+-]digits[.digits][e[+-]digits]`), also
/// accepting the `inf`, `infinity` and `nan` keywords.
pub fn parse_decimal_prefix(input: &[u8]) -> f64 {
    let input = skip_space(input);

    let (sign, unsigned) = match input.first() {
        Some(b'-') => (-1.0f64, &input[1..]),
        Some(b'+') => (1.0f64, &input[1..]),
        _ => (1.0f64, input),
    };
    if starts_with_ignore_case(unsigned, b"inf") {
        return sign * f64::INFINITY;
    }
    if starts_with_ignore_case(unsigned, b"nan") {
        return f64::NAN;
    }

    let len = decimal_prefix_len(input);
    if len == 0 {
        return 0.0;
    }

    // The prefix is plain ASCII, so both conversions only fail on malformed
    // prefixes, which decimal_prefix_len never produces
    core::str::from_utf8(&input[..len])
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .unwrap_or(0.0)
}
