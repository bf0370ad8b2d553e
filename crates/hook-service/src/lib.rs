//! # hook-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    AuthResponse, ChangePasswordRequest, ConfirmSignupRequest, CurrentUserResponse, LoginRequest,
    LogoutRequest, ProviderLoginRequest, RefreshTokenRequest, SignupPendingResponse, SignupRequest,
};
pub use services::{
    IdentityService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SessionService, SignupService,
};
