pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod notify;
pub mod storage;
