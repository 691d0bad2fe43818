//! Core business logic - framework-agnostic wizard engine and event
//! persistence operations.
//!
//! The wizard engine (sessions, plans, validation, navigation, coordinators)
//! carries no Discord types at all; the bot layer is a thin binding over it.

/// Event CRUD and lifecycle status transitions
pub mod events;
/// Loosely-typed form values captured by wizard steps
pub mod field;
/// Navigation state machine: advance, retreat, cancel, jump
pub mod navigation;
/// Step tables for the two wizards
pub mod plan;
/// Semantic validation for the scheduler (dates, reminders, title)
pub mod schedule;
/// Per-user in-memory session store
pub mod session;
/// Per-guild settings (prefix, default timezone)
pub mod servers;
/// Curated timezone catalogue
pub mod timezones;
/// Structural presence validation and entry-point resolution
pub mod validator;
/// Coordinators tying plan, store and finalize together
pub mod wizard;
