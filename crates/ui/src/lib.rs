//! Presentation layer: view models over service data and Dioxus views rendered to HTML.

#![forbid(unsafe_code)]

pub mod views;
pub mod vm;

pub use views::{
    ViewError, ViewState, render_completion, render_dashboard, render_document, render_games,
    render_progress, render_results,
};
