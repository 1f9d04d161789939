pub mod api;
pub mod channel;
pub mod chart;
pub mod config;
pub mod credentials;
pub mod flow;
pub mod group;
pub mod gui;
pub mod models;
pub mod notification;
pub mod routes;
pub mod validate;
pub mod websocket;
