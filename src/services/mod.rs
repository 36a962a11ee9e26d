pub mod cache;
pub mod fingerprint;
pub mod http_helpers;
pub mod json_extractor;
pub mod model_service;
pub mod pyq_service;
pub mod quiz_service;
pub mod rate_limiter;
pub mod sanitizer;
pub mod tutor_service;
