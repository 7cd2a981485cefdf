mod completion_vm;
mod dashboard_vm;
mod game_card_vm;
mod progress_vm;
mod result_row_vm;
mod risk_vm;
mod time_fmt;

pub use completion_vm::{CompletionStatus, CompletionVm, ScoreLineVm};
pub use dashboard_vm::DashboardVm;
pub use game_card_vm::{GameCardVm, game_catalogue};
pub use progress_vm::{AssessmentProgressVm, StageStepVm};
pub use result_row_vm::{ResultRowVm, game_label, map_result_rows};
pub use risk_vm::{RiskTone, RiskVm};
pub use time_fmt::{format_date, format_datetime, format_score};
