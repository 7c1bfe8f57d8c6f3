//! Service layer: framework-agnostic business logic.

pub mod access_control;
pub mod auth_service;
pub mod file_service;
pub mod post_service;
pub mod redis_service;
pub mod storage;
