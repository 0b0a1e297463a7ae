//! Transport connection status.

/// State of the telemetry transport connection.
///
/// This is logged and shown next to the online indicator; it never blanks
/// the displayed telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Connection attempt in progress.
    Connecting,
    /// Socket open, messages flowing.
    Connected,
    /// No connection (never opened, closed, or failed).
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disconnected() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
        assert!(!ConnectionStatus::default().is_connected());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionStatus::Connecting.to_string(), "Connecting");
        assert_eq!(ConnectionStatus::Connected.to_string(), "Connected");
        assert_eq!(ConnectionStatus::Disconnected.to_string(), "Disconnected");
    }
}
