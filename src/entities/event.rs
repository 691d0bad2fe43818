//! Event entity - Represents a sim-racing event in any lifecycle state.
//!
//! An event is created by the event wizard, optionally scheduled by the
//! scheduler wizard, and moves through the statuses `draft`, `scheduled`,
//! `active`, `archived` and `closed`. `status` is the source of truth;
//! `is_published` is a derived flag kept for quick filtering.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild the event belongs to
    pub guild_id: String,
    /// Event title, unique per guild (case-insensitive)
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// `"standard"`, `"league"`, `"tournament"` or `"championship"`
    pub event_type: String,
    /// Lifecycle status: `draft`, `scheduled`, `active`, `archived`, `closed`
    pub status: String,
    /// Derived publication flag (true iff status is `active`)
    pub is_published: bool,
    /// Championship events form a series; the root round points at itself
    pub is_championship: bool,
    /// Series root id for championship rounds
    pub championship_id: Option<i64>,

    /// Track selected as free text
    pub track_name: Option<String>,
    /// Track selected from a saved track list
    pub track_list_id: Option<i64>,
    /// Vehicles described as free text
    pub vehicle_text: Option<String>,
    /// Vehicles selected from a saved vehicle list
    pub vehicle_list_id: Option<i64>,

    /// Practice session length in minutes
    pub practice_time: Option<i32>,
    /// Qualifying session length in minutes
    pub qualy_time: Option<i32>,
    /// Race length in minutes (or laps, per community convention)
    pub race_time: Option<i32>,
    /// Fuel consumption rate in percent
    pub fuel_rate: Option<i32>,
    /// Tire wear rate in percent
    pub tire_wear_rate: Option<i32>,
    /// Damage multiplier in percent
    pub damage_multiplier: Option<i32>,
    /// Weather description
    pub weather: Option<String>,
    /// Driving assists summary (ABS, TC, ...)
    pub assists: Option<String>,
    /// Bullet-point rules text
    pub rules_text: Option<String>,
    /// Link to an external regulation document
    pub regulation_link: Option<String>,

    /// IANA timezone name the organizer picked for local-time displays
    pub timezone: Option<String>,
    /// When the race itself starts
    pub event_datetime_utc: Option<DateTimeUtc>,
    /// When the event is (or was) published
    pub publish_datetime_utc: Option<DateTimeUtc>,
    /// When driver registration opens
    pub registration_open_utc: Option<DateTimeUtc>,
    /// When driver registration closes
    pub registration_close_utc: Option<DateTimeUtc>,
    /// Reminder lead times in minutes before the event, comma-separated
    pub reminders: Option<String>,

    /// Discord user that created the event
    pub created_by: String,
    /// Creation timestamp
    pub created_at: DateTimeUtc,
    /// Set when the event went `active`
    pub published_at: Option<DateTimeUtc>,
    /// Set when the event was archived
    pub archived_at: Option<DateTimeUtc>,
    /// Archived events expire 30 days after archiving
    pub archive_expires_at: Option<DateTimeUtc>,
    /// Discord user that last edited the event
    pub last_edited_by: Option<String>,
    /// Last edit timestamp
    pub last_edited_date: Option<DateTimeUtc>,
}

/// Events have no entity-level relationships; track and vehicle lists are
/// referenced by id only.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
