//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and issues its requests through
//! `net::request`; shaping logic lives in `util::task_form` or in small pure
//! helpers next to the page so it is testable without a browser.

pub mod dashboard;
pub mod login;
pub mod register;
pub mod task_form;
pub mod task_list;
pub mod task_view;
