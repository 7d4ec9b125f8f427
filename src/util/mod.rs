//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns and pure form shaping
//! from page and component logic to improve reuse and testability.

pub mod clock;
pub mod credential;
pub mod storage;
pub mod task_form;
