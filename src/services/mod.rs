pub mod personalization;

pub mod generation_service;
pub mod generation_service_impl;
pub use generation_service::{
    GenerationError, GenerationOutcome, GenerationRequest, GenerationService,
};
pub use generation_service_impl::SeaOrmGenerationService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;
