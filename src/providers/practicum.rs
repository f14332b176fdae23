use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

use crate::error::BotError;
use crate::models::Homework;

const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Verdict sentence for a known review status.
fn verdict_for(status: &str) -> Option<&'static str> {
    match status {
        "approved" => Some("Работа проверена: ревьюеру всё понравилось. Ура!"),
        "reviewing" => Some("Работа взята на проверку ревьюером."),
        "rejected" => Some("Работа проверена: у ревьюера есть замечания."),
        _ => None,
    }
}

pub struct PracticumClient {
    token: String,
    client: reqwest::Client,
}

impl PracticumClient {
    pub fn new(token: &str) -> Self {
        PracticumClient {
            token: token.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// One authenticated GET for the homework list since `from_date`.
    /// Every transport fault collapses into `RemoteRequest` with the cause
    /// text preserved; the status-code mapping lives in `handle_response`.
    pub async fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
        debug!("requesting homework statuses with from_date={}", from_date);

        let response = self
            .client
            .get(ENDPOINT)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| BotError::RemoteRequest(format!("запрос не выполнен: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::RemoteRequest(format!("тело ответа не прочитано: {}", e)))?;

        handle_response(status, &body)
    }
}

/// Map an HTTP status and body to the raw JSON payload or a typed fault.
/// 400 and 401 carry a diagnostic in the body (`error` and `message`
/// respectively); every other non-200 status gets the generic message.
pub(crate) fn handle_response(status: u16, body: &str) -> Result<Value, BotError> {
    match status {
        200 => serde_json::from_str(body)
            .map_err(|e| BotError::RemoteRequest(format!("ответ не является JSON: {}", e))),
        400 => Err(BotError::RemoteRequest(body_diagnostic(body, "error"))),
        401 => Err(BotError::RemoteRequest(body_diagnostic(body, "message"))),
        other => Err(BotError::RemoteRequest(format!(
            "неизвестный код ошибки {}",
            other
        ))),
    }
}

fn body_diagnostic(body: &str, field: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(v) => v
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Shape-check the decoded payload and pull out the first homework record.
///
/// An empty `homeworks` list is not a fault: it means nothing changed in the
/// polling window and comes back as `Ok(None)`. Wrong container shapes are
/// `MalformedResponse`; missing keys and undecodable records are
/// `RemoteRequest`, matching the reported-error classes of the original bot.
pub fn check_response(response: &Value) -> Result<Option<Homework>, BotError> {
    let object = response.as_object().ok_or_else(|| {
        BotError::MalformedResponse("ответ не является объектом".to_string())
    })?;

    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| BotError::RemoteRequest("в ответе нет поля homeworks".to_string()))?;

    let homeworks = homeworks.as_array().ok_or_else(|| {
        BotError::MalformedResponse("поле homeworks не является списком".to_string())
    })?;

    let first = match homeworks.first() {
        None => return Ok(None),
        Some(first) => first,
    };

    if !first.is_object() {
        return Err(BotError::MalformedResponse(
            "элемент homeworks не является объектом".to_string(),
        ));
    }

    let homework: Homework = serde_json::from_value(first.clone())
        .map_err(|e| BotError::RemoteRequest(format!("запись о работе неполная: {}", e)))?;

    Ok(Some(homework))
}

/// Render the notification sentence for a record. Fails when the status is
/// empty or absent from the fixed verdict table.
pub fn parse_status(homework: &Homework) -> Result<String, BotError> {
    let verdict = verdict_for(&homework.status).ok_or_else(|| {
        BotError::RemoteRequest(format!("статус \"{}\" не найден", homework.status))
    })?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework.homework_name, verdict
    ))
}
