pub mod articles;
pub mod lottery;
pub mod scheme;
pub mod tools;
pub mod users;
