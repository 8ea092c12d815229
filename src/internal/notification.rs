use std::time::{Duration, Instant};

/// Severity of a toast; decides colour and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Warning,
}

impl NotificationType {
    fn timeout(&self) -> Duration {
        match self {
            NotificationType::Info => Duration::from_secs(2),
            NotificationType::Warning => Duration::from_secs(6),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::Info => "Info",
            NotificationType::Warning => "Warning",
        }
    }
}

/// A short-lived message drawn over the screen, independent of the joke state.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: Instant,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            timestamp: Instant::now(),
        }
    }

    pub fn should_dismiss(&self) -> bool {
        self.timestamp.elapsed() > self.notification_type.timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_notification_is_kept() {
        let n = Notification::info("Sound off");
        assert!(!n.should_dismiss());
        assert_eq!(n.notification_type.title(), "Info");
    }

    #[test]
    fn test_expired_notification_is_dismissed() {
        let mut n = Notification::warning("No API key configured");
        n.timestamp = Instant::now() - Duration::from_secs(10);
        assert!(n.should_dismiss());
    }
}
