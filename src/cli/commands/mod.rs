pub mod discover;
pub mod replay;
