mod assessment;
mod completion;
mod dashboard;
mod games;
mod render;
mod risk;
mod state;

#[cfg(test)]
mod view_smoke;

pub use assessment::{ProgressHeader, render_progress};
pub use completion::{CompletionView, render_completion};
pub use dashboard::{DashboardView, ResultTable, render_dashboard, render_results};
pub use games::{GamesView, render_games};
pub use render::render_document;
pub use risk::RiskPanel;
pub use state::{ErrorNotice, ViewError, ViewState};
