#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod error;
pub mod flow;
pub mod recorder;
pub mod reports;

pub use mindcheck_core::Clock;

pub use api::{AssessmentApi, BackendClient, EndpointCheck, SubmissionPayload, check_endpoints};
pub use auth::{Access, AuthSession, guard};
pub use config::AppConfig;
pub use countdown::{CountdownEvent, CountdownHandle, start_countdown};
pub use dashboard::{DashboardData, DashboardService, DashboardStats};
pub use error::{ApiError, FailureKind, FlowError, RecorderError, ReportError};
pub use flow::{Advance, AssessmentFlow};
pub use recorder::{AudioSource, FileAudioSource, Recorder};
pub use reports::ReportService;
