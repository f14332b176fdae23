use serde::Deserialize;

/// One submission as returned by the review API. Both fields are required;
/// a record missing either is reported as a remote-request fault.
#[derive(Debug, Deserialize, Clone)]
pub struct Homework {
    pub homework_name: String,
    pub status: String,
}
