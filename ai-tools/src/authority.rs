//! Per-user authority levels gating the commands.

use crate::config::AiToolsConfig;

/// Level granted to configured admins.
pub const ADMIN_AUTHORITY: u8 = 4;

/// Admins get [`ADMIN_AUTHORITY`]; everyone else the configured default.
#[derive(Debug, Clone)]
pub struct AuthorityPolicy {
    admin_user_ids: Vec<i64>,
    default_level: u8,
}

impl AuthorityPolicy {
    pub fn new(admin_user_ids: Vec<i64>, default_level: u8) -> Self {
        Self {
            admin_user_ids,
            default_level,
        }
    }

    pub fn from_config(config: &AiToolsConfig) -> Self {
        Self::new(config.admin_user_ids.clone(), config.default_authority)
    }

    pub fn level_of(&self, user_id: i64) -> u8 {
        if self.admin_user_ids.contains(&user_id) {
            ADMIN_AUTHORITY
        } else {
            self.default_level
        }
    }

    pub fn permits(&self, user_id: i64, required: u8) -> bool {
        self.level_of(user_id) >= required
    }
}
