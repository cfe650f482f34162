//! Strategy signal decoding

/// Trade annotations carried as a numeric column.
///
/// The encoding is `1` enter long, `2` exit long, `-1` enter short,
/// `-2` exit short. Zero, NaN and anything else mean no signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    EnterLong,
    ExitLong,
    EnterShort,
    ExitShort,
}

impl SignalKind {
    pub fn from_value(value: f64) -> Option<SignalKind> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        match value as i64 {
            1 => Some(SignalKind::EnterLong),
            2 => Some(SignalKind::ExitLong),
            -1 => Some(SignalKind::EnterShort),
            -2 => Some(SignalKind::ExitShort),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_decode() {
        assert_eq!(SignalKind::from_value(1.0), Some(SignalKind::EnterLong));
        assert_eq!(SignalKind::from_value(2.0), Some(SignalKind::ExitLong));
        assert_eq!(SignalKind::from_value(-1.0), Some(SignalKind::EnterShort));
        assert_eq!(SignalKind::from_value(-2.0), Some(SignalKind::ExitShort));
    }

    #[test]
    fn test_everything_else_is_no_signal() {
        assert_eq!(SignalKind::from_value(0.0), None);
        assert_eq!(SignalKind::from_value(3.0), None);
        assert_eq!(SignalKind::from_value(1.5), None);
        assert_eq!(SignalKind::from_value(f64::NAN), None);
    }
}
