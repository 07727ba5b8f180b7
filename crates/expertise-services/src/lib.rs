//! # expertise-services
//!
//! Clients for the external annotation and relatedness service, the bounded
//! retry loop they share, and the caches placed in front of them.

pub mod cache;
pub mod cached;
pub mod http;
pub mod tagme;

pub use cache::{AnnotationCache, RelatednessCache, ServiceCaches};
pub use cached::{CachedAnnotator, CachedRelatedness};
pub use http::{HttpClient, RetryPolicy};
pub use tagme::TagmeClient;
