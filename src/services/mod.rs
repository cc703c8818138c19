pub mod auth;
pub mod excel;
pub mod filter;
