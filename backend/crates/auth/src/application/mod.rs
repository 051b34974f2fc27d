//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod verify_otp;

// Re-exports
pub use config::AuthConfig;
pub use current_session::{CurrentSession, CurrentSessionUseCase, SessionUser};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use verify_otp::{VerifyOtpInput, VerifyOtpOutput, VerifyOtpUseCase};
