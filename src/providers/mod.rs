pub mod practicum;
pub mod telegram;
