pub mod combine_delegate;
pub mod media_host;
pub mod media_source;
pub mod raster_surface;
pub mod stream_encoder;
