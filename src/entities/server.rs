//! Server entity - Per-guild settings.
//!
//! Stores the default timezone used to pre-fill the scheduler wizard for
//! that guild.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Server settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "servers")]
pub struct Model {
    /// Discord guild id
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Default IANA timezone name for this guild
    pub timezone: Option<String>,
}

/// Server settings have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
