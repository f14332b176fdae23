use thiserror::Error;

/// Faults a polling cycle can recover from. Nothing here terminates the
/// process; the runtime renders a report, deduplicates it against the
/// previous cycle and moves on to the next sleep.
#[derive(Debug, Error)]
pub enum BotError {
    /// Transport fault, non-200 status, undecodable body or a record with
    /// missing/unknown fields.
    #[error("ошибка запроса к API: {0}")]
    RemoteRequest(String),

    /// The `homeworks` payload does not have the documented shape.
    #[error("некорректный формат ответа: {0}")]
    MalformedResponse(String),
}

impl BotError {
    /// User-visible report text. The numeric labels are part of the chat
    /// contract and distinguish shape errors from everything else.
    pub fn report(&self) -> String {
        match self {
            BotError::MalformedResponse(_) => format!("Сбой в работе программы 1: {}", self),
            BotError::RemoteRequest(_) => format!("Сбой в работе программы 2: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_labels_distinguish_error_classes() {
        let remote = BotError::RemoteRequest("timeout".to_string());
        assert!(remote.report().starts_with("Сбой в работе программы 2:"));

        let malformed = BotError::MalformedResponse("homeworks is not a list".to_string());
        assert!(malformed.report().starts_with("Сбой в работе программы 1:"));
    }
}
