//! Concrete [`ImageGenerationClient`](crate::image_generation::ImageGenerationClient)
//! implementations and the HTTP plumbing they share.

pub mod http_pool;
pub mod imagen;
