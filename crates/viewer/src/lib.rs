pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod routes;
pub mod session;
pub mod view;
