//! Runtime utilities for Axelscope: health endpoint, shutdown signal and
//! request rate limiting.

pub mod health;
pub mod rate_limiter;
pub mod shutdown;
