pub mod config;
pub mod http;
pub mod password;
pub mod persistence;
pub mod storage;
