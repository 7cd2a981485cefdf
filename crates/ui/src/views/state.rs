use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// The backend could not be reached or answered with an error.
    Backend(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.".to_string(),
            ViewError::Backend(detail) => {
                format!("Something went wrong. Please try again. ({detail})")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for ViewState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(err) => ViewState::Error(ViewError::Backend(err.to_string())),
        }
    }
}

#[component]
pub fn ErrorNotice(message: String) -> Element {
    rsx! {
        div { class: "error",
            p { "{message}" }
            p { "Retry" }
        }
    }
}
