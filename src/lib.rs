pub mod aggregate;
pub mod app;
pub mod config;
pub mod controller;
pub mod data;
pub mod filter;
pub mod logging;
pub mod model;
pub mod storage;
pub mod verify;
pub mod view;
