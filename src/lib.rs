//! Library crate for prism-back: the mesh-gradient engine and the HTTP service
//! wrapping it, exposed for binaries and integration tests.

pub mod animation;
pub mod color;
pub mod config;
pub mod dto;
pub mod error;
pub mod mesh;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
