use std::sync::mpsc;

use fanpulse_core::{Notice, NoticeLevel};
use fanpulse_logging::{pulse_error, pulse_info, pulse_warn};

use crate::ApiError;

/// Receiver of transient user-facing notices.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to a front-end over a channel.
pub struct ChannelNotificationSink {
    tx: mpsc::Sender<Notice>,
}

impl ChannelNotificationSink {
    pub fn new(tx: mpsc::Sender<Notice>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }
}

/// Writes notices to the log; used when no front-end is listening.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => pulse_info!("{}", notice.message),
            NoticeLevel::Warning => pulse_warn!("{}", notice.message),
            NoticeLevel::Error => pulse_error!("{}", notice.message),
        }
    }
}

/// User-facing notice for a failed request, keyed by status.
pub fn failure_notice(error: &ApiError) -> Notice {
    let message = match error {
        ApiError::Http { status: 400, message } => message
            .clone()
            .unwrap_or_else(|| "Invalid request".to_string()),
        ApiError::Http { status: 401, .. } => "Unauthorized".to_string(),
        ApiError::Http { status: 403, .. } => "Access denied".to_string(),
        ApiError::Http { status: 404, .. } => "Resource not found".to_string(),
        ApiError::Http { status: 429, .. } => "Too many requests. Please wait.".to_string(),
        ApiError::Http { status: 500, .. } => {
            "Server error. Please try again later.".to_string()
        }
        ApiError::Http { message, .. } => message
            .clone()
            .unwrap_or_else(|| "An unknown error occurred".to_string()),
        ApiError::NetworkUnreachable(_) => {
            "Cannot reach the server. Check your connection.".to_string()
        }
        ApiError::Unexpected(_) => "An unexpected error occurred".to_string(),
    };
    Notice::error(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_prefers_backend_message() {
        let error = ApiError::Http {
            status: 400,
            message: Some("Comment IDs array cannot be empty".to_string()),
        };
        assert_eq!(
            failure_notice(&error).message,
            "Comment IDs array cannot be empty"
        );
    }

    #[test]
    fn known_statuses_use_fixed_messages() {
        let error = ApiError::Http {
            status: 404,
            message: Some("Team not found".to_string()),
        };
        assert_eq!(failure_notice(&error).message, "Resource not found");
    }

    #[test]
    fn unknown_status_falls_back_to_generic() {
        let error = ApiError::Http {
            status: 418,
            message: None,
        };
        let notice = failure_notice(&error);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "An unknown error occurred");
    }
}
