use chrono::Utc;
use serde_json::Value;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::{
    config::Config,
    error::BotError,
    providers::practicum::{self, PracticumClient},
    providers::telegram::Telegram,
};

/// Pause between cycle starts.
const RETRY_PERIOD: Duration = Duration::from_secs(600);

/// Outcome of validating one fetched payload against the tracked state.
#[derive(Debug)]
enum StatusUpdate {
    /// The status moved to a new value; `message` is ready to send.
    Changed { status: String, message: String },
    /// Same status as last cycle; nothing to send.
    Unchanged(String),
    /// The polling window contained no homework records.
    Empty,
}

pub struct Runtime {
    practicum: PracticumClient,
    telegram: Telegram,
    /// Lower bound of the next query window, advanced after each clean cycle.
    cursor: i64,
    previous_status: String,
    previous_error: String,
    notify_on_error: bool,
}

impl Runtime {
    pub fn new(config: Config) -> Self {
        let practicum = PracticumClient::new(&config.practicum_token);
        let telegram = Telegram::new(&config.telegram_token, config.telegram_chat_id);
        Runtime {
            practicum,
            telegram,
            cursor: Utc::now().timestamp(),
            previous_status: String::new(),
            previous_error: String::new(),
            notify_on_error: config.notify_on_error,
        }
    }

    pub async fn run_periodically(&mut self) -> Result<(), anyhow::Error> {
        info!("=== Starting homework status bot ===");
        info!("polling period: {}s", RETRY_PERIOD.as_secs());
        info!("error notifications to chat: {}", self.notify_on_error);

        loop {
            self.run_cycle().await;
            sleep(RETRY_PERIOD).await;
        }
    }

    /// One fetch/validate/notify pass. Every fault ends up here; nothing
    /// escapes to terminate the loop.
    async fn run_cycle(&mut self) {
        match self.poll_once().await {
            Ok(()) => {}
            Err(e) => self.handle_failure(e).await,
        }
    }

    async fn poll_once(&mut self) -> Result<(), BotError> {
        let raw = self.practicum.fetch(self.cursor).await?;
        let next_cursor = next_cursor(&raw);
        let update = self.evaluate(&raw)?;
        self.cursor = next_cursor;

        match update {
            StatusUpdate::Changed { status, message } => {
                self.telegram.send_message(&message).await;
                self.previous_status = status;
            }
            StatusUpdate::Unchanged(status) => {
                debug!("status \"{}\" unchanged, no message sent", status);
            }
            StatusUpdate::Empty => {
                debug!("no homework updates in the polling window");
            }
        }

        Ok(())
    }

    /// Compare the fetched payload against the tracked status. Notification
    /// is edge-triggered: a status fires at most once per contiguous run of
    /// identical values.
    fn evaluate(&self, raw: &Value) -> Result<StatusUpdate, BotError> {
        let homework = match practicum::check_response(raw)? {
            None => return Ok(StatusUpdate::Empty),
            Some(homework) => homework,
        };

        if homework.status != self.previous_status {
            let message = practicum::parse_status(&homework)?;
            Ok(StatusUpdate::Changed {
                status: homework.status,
                message,
            })
        } else {
            Ok(StatusUpdate::Unchanged(homework.status))
        }
    }

    async fn handle_failure(&mut self, e: BotError) {
        let message = e.report();
        if self.note_error(&message) {
            error!("{}", message);
            if self.notify_on_error {
                self.telegram.send_message(&message).await;
            }
        } else {
            debug!("duplicate error suppressed: {}", message);
        }
    }

    /// Record a rendered error report. Returns false when the text matches
    /// the previous cycle's report exactly, which suppresses both the log
    /// line and the chat notification.
    fn note_error(&mut self, message: &str) -> bool {
        if self.previous_error == message {
            return false;
        }
        self.previous_error = message.to_string();
        true
    }
}

/// Next query window start: the server's clock when it sends one, our own
/// otherwise.
fn next_cursor(raw: &Value) -> i64 {
    raw.get("current_date")
        .and_then(Value::as_i64)
        .unwrap_or_else(|| Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_runtime() -> Runtime {
        Runtime::new(Config {
            practicum_token: "practicum-token".to_string(),
            telegram_token: "0000000000:TEST".to_string(),
            telegram_chat_id: 1,
            notify_on_error: true,
        })
    }

    #[test]
    fn status_change_is_notified_exactly_once() {
        let mut runtime = test_runtime();
        let raw = json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1_700_000_000,
        });

        // Cycle 1: empty previous status, the transition fires.
        let update = runtime.evaluate(&raw).unwrap();
        let status = match update {
            StatusUpdate::Changed { status, message } => {
                assert_eq!(
                    message,
                    "Изменился статус проверки работы \"proj1\". \
                     Работа проверена: ревьюеру всё понравилось. Ура!"
                );
                status
            }
            other => panic!("expected Changed, got {:?}", other),
        };
        runtime.previous_status = status;

        // Cycle 2: identical payload, no second notification.
        let update = runtime.evaluate(&raw).unwrap();
        assert!(matches!(update, StatusUpdate::Unchanged(_)));
    }

    #[test]
    fn empty_homework_list_skips_notification() {
        let runtime = test_runtime();
        let raw = json!({"homeworks": [], "current_date": 1_700_000_000});
        let update = runtime.evaluate(&raw).unwrap();
        assert!(matches!(update, StatusUpdate::Empty));
    }

    #[test]
    fn unknown_status_is_a_reported_error() {
        let runtime = test_runtime();
        let raw = json!({
            "homeworks": [{"homework_name": "proj1", "status": "lost"}],
        });
        let e = runtime.evaluate(&raw).unwrap_err();
        assert!(matches!(e, BotError::RemoteRequest(_)));
    }

    #[test]
    fn identical_error_reports_are_suppressed() {
        let mut runtime = test_runtime();
        let report = BotError::RemoteRequest("X".to_string()).report();

        assert!(runtime.note_error(&report), "first occurrence is reported");
        assert!(!runtime.note_error(&report), "repeat is suppressed");

        let other = BotError::RemoteRequest("Y".to_string()).report();
        assert!(runtime.note_error(&other), "new text is reported again");
    }

    #[test]
    fn cursor_follows_server_clock_when_present() {
        let raw = json!({"homeworks": [], "current_date": 1_700_000_123});
        assert_eq!(next_cursor(&raw), 1_700_000_123);

        let before = Utc::now().timestamp();
        let raw = json!({"homeworks": []});
        assert!(next_cursor(&raw) >= before);
    }
}
