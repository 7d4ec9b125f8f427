//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `route_gate` guards the authenticated route tree; the rest are layout and
//! presentation pieces shared by pages.

pub mod layout;
pub mod metrics_card;
pub mod route_gate;
pub mod sidebar;
pub mod spinner;
pub mod toast_host;
