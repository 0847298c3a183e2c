//! Wire types exchanged with the BCM backend.
//!
//! Every record here is owned by the backend; the client only decodes it and
//! never constructs one for sending.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Role name that disables role filtering.
pub const ALL_ROLES: &str = "ALL";

/// Database id of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub i64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database id of a stored command result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub i64);

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of a command as keyed in a device's command map.
///
/// JSON object keys are always strings, while result records carry the same
/// id as a number, so both forms decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CommandId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CommandIdVisitor;

        impl<'de> Visitor<'de> for CommandIdVisitor {
            type Value = CommandId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a command id as string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CommandId, E> {
                Ok(CommandId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CommandId, E> {
                Ok(CommandId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CommandId, E> {
                Ok(CommandId(v.to_string()))
            }
        }

        deserializer.deserialize_any(CommandIdVisitor)
    }
}

/// A managed network device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgmt_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_function: Option<String>,
    /// Role tags the device belongs to
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_roles: Vec<String>,
    /// Command id -> command syntax
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: BTreeMap<CommandId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Device {
    /// Whether the device carries the given role tag.
    pub fn has_role(&self, role: &str) -> bool {
        self.device_roles.iter().any(|r| r == role)
    }

    /// Find the id of the command whose syntax equals `syntax` exactly.
    pub fn command_id_for(&self, syntax: &str) -> Option<&CommandId> {
        self.commands
            .iter()
            .find(|(_, s)| s.as_str() == syntax)
            .map(|(id, _)| id)
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("device-{}", self.id),
        }
    }
}

/// A device role as listed by the backend.
///
/// The backend has served roles both as bare strings and as `{"name": ...}`
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RoleRepr")]
pub struct DeviceRole {
    pub name: String,
}

impl DeviceRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Bare(String),
    Named { name: String },
}

impl From<RoleRepr> for DeviceRole {
    fn from(repr: RoleRepr) -> Self {
        match repr {
            RoleRepr::Bare(name) | RoleRepr::Named { name } => DeviceRole { name },
        }
    }
}

/// Role filter applied to the device list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum RoleFilter {
    /// The `"ALL"` sentinel: every device matches
    All,
    /// Only devices tagged with this role
    Role(String),
}

impl RoleFilter {
    pub fn parse(role: &str) -> Self {
        if role == ALL_ROLES {
            RoleFilter::All
        } else {
            RoleFilter::Role(role.to_string())
        }
    }

    pub fn matches(&self, device: &Device) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Role(role) => device.has_role(role),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoleFilter::All => ALL_ROLES,
            RoleFilter::Role(role) => role,
        }
    }
}

/// A stored command result. Only `id` is interpreted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResult {
    pub id: ResultId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Remaining backend fields, kept verbatim
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Backend-computed diff between two results, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comparison(pub serde_json::Value);

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
