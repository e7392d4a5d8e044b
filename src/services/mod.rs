/// Animation control and the frame stream.
pub mod animation_service;
/// Stateless color conversion, interpolation and mixing.
pub mod color_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Structured export payloads.
pub mod export_service;
/// Health check service.
pub mod health_service;
/// Studio session lifecycle and mesh editing.
pub mod mesh_service;
/// Vector descriptors and raster previews.
pub mod render_service;
