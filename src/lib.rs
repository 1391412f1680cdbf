//! Asset catalog server
//!
//! Serves folder listings and file bytes for two on-disk asset
//! collections: equirectangular panoramas and glTF models.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod state;
