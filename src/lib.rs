//! Access Gateway - chat or payment routing for GTStor accounts
//!
//! Given an identifier taken from the request query or cookies, the gateway
//! finds the caller in flat-file user and subscription stores and sends them
//! to the chat when they hold direct access or an active subscription, or to
//! the payment page with their id attached otherwise.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
