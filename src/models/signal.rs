//! Signal display mapping

/// Style class attached to the signal field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalClass {
    Buy,
    Sell,
    Neutral,
}

impl SignalClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalClass::Buy => "buy",
            SignalClass::Sell => "sell",
            SignalClass::Neutral => "neutral",
        }
    }
}

/// What the signal field shows for a raw backend signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalDisplay {
    pub text: &'static str,
    /// `None` for unrecognised signals
    pub class: Option<SignalClass>,
}

impl SignalDisplay {
    /// Map a backend signal (case-insensitive) to its display text and class
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "LONG" => Self {
                text: "Long (Buy Signal)",
                class: Some(SignalClass::Buy),
            },
            "SHORT" => Self {
                text: "Short (Sell Signal)",
                class: Some(SignalClass::Sell),
            },
            "HOLD" => Self {
                text: "Hold (Neutral)",
                class: Some(SignalClass::Neutral),
            },
            _ => Self {
                text: "Unknown Signal",
                class: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_mapping() {
        let expected = SignalDisplay::from_raw("LONG");
        assert_eq!(SignalDisplay::from_raw("long"), expected);
        assert_eq!(SignalDisplay::from_raw("Long"), expected);
        assert_eq!(expected.text, "Long (Buy Signal)");
        assert_eq!(expected.class, Some(SignalClass::Buy));
    }

    #[test]
    fn test_short_and_hold() {
        let short = SignalDisplay::from_raw("short");
        assert_eq!(short.text, "Short (Sell Signal)");
        assert_eq!(short.class, Some(SignalClass::Sell));

        let hold = SignalDisplay::from_raw("HOLD");
        assert_eq!(hold.text, "Hold (Neutral)");
        assert_eq!(hold.class, Some(SignalClass::Neutral));
    }

    #[test]
    fn test_unknown_signal_has_no_class() {
        let unknown = SignalDisplay::from_raw("FOO");
        assert_eq!(unknown.text, "Unknown Signal");
        assert_eq!(unknown.class, None);
    }
}
