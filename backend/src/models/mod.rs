pub mod category;
pub mod search;
