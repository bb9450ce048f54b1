//! Download pass-through.
//!
//! # Responsibilities
//! - Validate where a download may come from (allow-list, private hosts)
//! - Name files and normalize their content types
//! - Turn upstream bodies into attachment responses
//!
//! # Design Decisions
//! - Images are small and buffered so `Content-Length` is exact
//! - Video and audio are streamed chunk by chunk, never held in memory

pub mod guard;
pub mod headers;
pub mod stream;

pub use guard::{check_image_host, check_media_url, decode_image_url, GuardError};
pub use headers::{image_filename, normalize_image_type, ImageKind};
pub use stream::{image_response, media_response, upstream_content_type};
