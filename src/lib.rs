pub mod classify;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod fetch;
pub mod fragment;
pub mod model;
pub mod origin;
pub mod pipeline;
pub mod store;
