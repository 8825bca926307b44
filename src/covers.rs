//! Cover aggregation
//!
//! A physical cover shows up in the ESF export as several group addresses
//! (move, stop, position, ...). This module folds them back into one
//! [`CoverGroup`] per device and works out which address plays which role.

use crate::config::{RoleTokens, TranslatorConfig};
use crate::parser::{base_name, Classification, DeviceRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Placeholder for a role with no matching address
pub const MISSING: &str = "MISSING";

/// Semantic function of a cover group address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverRole {
    MoveLong,
    Stop,
    Position,
    PositionState,
    Angle,
    AngleState,
}

impl CoverRole {
    /// All roles in output order
    pub const ALL: [CoverRole; 6] = [
        CoverRole::MoveLong,
        CoverRole::Stop,
        CoverRole::Position,
        CoverRole::PositionState,
        CoverRole::Angle,
        CoverRole::AngleState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverRole::MoveLong => "move_long",
            CoverRole::Stop => "stop",
            CoverRole::Position => "position",
            CoverRole::PositionState => "position_state",
            CoverRole::Angle => "angle",
            CoverRole::AngleState => "angle_state",
        }
    }

    /// Token to search for, and the token that must be absent
    ///
    /// The plain position/angle tokens are substrings of their state
    /// counterparts, so those roles exclude actions carrying the state token.
    pub fn tokens<'a>(&self, roles: &'a RoleTokens) -> (&'a str, Option<&'a str>) {
        match self {
            CoverRole::MoveLong => (roles.move_long.as_str(), None),
            CoverRole::Stop => (roles.stop.as_str(), None),
            CoverRole::Position => (
                roles.position.as_str(),
                Some(roles.position_state.as_str()),
            ),
            CoverRole::PositionState => (roles.position_state.as_str(), None),
            CoverRole::Angle => (roles.angle.as_str(), Some(roles.angle_state.as_str())),
            CoverRole::AngleState => (roles.angle_state.as_str(), None),
        }
    }
}

impl fmt::Display for CoverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical cover with its resolved group addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverGroup {
    /// Base name shared by all addresses of the cover
    pub name: String,
    pub classification: Classification,
    pub move_long_address: String,
    pub stop_address: String,
    pub position_address: String,
    pub position_state_address: String,
    /// Only set for tilt covers
    pub angle_address: Option<String>,
    /// Only set for tilt covers
    pub angle_state_address: Option<String>,
}

impl CoverGroup {
    pub fn is_tilt(&self) -> bool {
        self.classification == Classification::CoverTilt
    }

    /// Address for a role, `None` if the role does not apply to this cover
    pub fn address(&self, role: CoverRole) -> Option<&str> {
        match role {
            CoverRole::MoveLong => Some(self.move_long_address.as_str()),
            CoverRole::Stop => Some(self.stop_address.as_str()),
            CoverRole::Position => Some(self.position_address.as_str()),
            CoverRole::PositionState => Some(self.position_state_address.as_str()),
            CoverRole::Angle => self.angle_address.as_deref(),
            CoverRole::AngleState => self.angle_state_address.as_deref(),
        }
    }

    /// Applicable roles that fell back to [`MISSING`]
    pub fn unresolved_roles(&self) -> Vec<CoverRole> {
        CoverRole::ALL
            .into_iter()
            .filter(|role| self.address(*role) == Some(MISSING))
            .collect()
    }
}

/// Find the first candidate whose action contains `token` but not `exclude`
pub fn find_role_address<'a>(
    candidates: &[&'a DeviceRecord],
    token: &str,
    exclude: Option<&str>,
) -> Option<&'a str> {
    candidates
        .iter()
        .find(|record| {
            record.action.contains(token)
                && exclude.map_or(true, |excluded| !record.action.contains(excluded))
        })
        .map(|record| record.address.as_str())
}

/// Group cover records into one [`CoverGroup`] per base name
///
/// Groups are returned sorted by base name. Non-cover records are ignored.
pub fn aggregate_covers(records: &[DeviceRecord], config: &TranslatorConfig) -> Vec<CoverGroup> {
    let covers: Vec<&DeviceRecord> = records
        .iter()
        .filter(|record| record.classification.is_cover())
        .collect();

    let base_names: BTreeSet<&str> = covers.iter().map(|record| base_name(&record.name)).collect();

    base_names
        .into_iter()
        .filter_map(|name| build_group(name, &covers, &config.roles))
        .collect()
}

fn build_group(name: &str, covers: &[&DeviceRecord], roles: &RoleTokens) -> Option<CoverGroup> {
    let selected: Vec<&DeviceRecord> = covers
        .iter()
        .copied()
        .filter(|record| record.name.contains(name))
        .collect();
    let classification = selected.first()?.classification;

    let resolve = |role: CoverRole| {
        let (token, exclude) = role.tokens(roles);
        match find_role_address(&selected, token, exclude) {
            Some(address) => address.to_string(),
            None => {
                warn!("Cover '{}' has no {} address", name, role);
                MISSING.to_string()
            }
        }
    };

    let tilt = classification == Classification::CoverTilt;
    Some(CoverGroup {
        name: name.to_string(),
        classification,
        move_long_address: resolve(CoverRole::MoveLong),
        stop_address: resolve(CoverRole::Stop),
        position_address: resolve(CoverRole::Position),
        position_state_address: resolve(CoverRole::PositionState),
        angle_address: tilt.then(|| resolve(CoverRole::Angle)),
        angle_state_address: tilt.then(|| resolve(CoverRole::AngleState)),
    })
}
