pub mod drive_models;
pub mod drive_service;

pub use drive_models::{AuthUrl, IntegrationStatus};
pub use drive_service::{
    ApiRequest, ApiResponse, BoxError, DriveIntegrationError, DriveIntegrationService,
    HttpMethod, HttpTransport, TokenProvider,
};
