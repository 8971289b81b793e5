pub mod assessment;
pub mod cover_letter;
pub mod insight;
pub mod user;
