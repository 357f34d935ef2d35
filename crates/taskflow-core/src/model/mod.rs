//! Domain records for every Taskflow table
//!
//! Each module holds the stored record, the create payload and, where the
//! record is editable, a patch payload. Payloads deserialize straight from
//! request bodies; validation lives in `crate::rules`.

/// Implements `as_str`, `Display`, `FromStr` (case-insensitive) and
/// string serde for a status-like enum.
macro_rules! string_enum {
    ($name:ident, $entity:literal, { $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::TaskflowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $(
                    if needle.eq_ignore_ascii_case($text) $(|| needle.eq_ignore_ascii_case($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(crate::model::unknown_value($entity, s))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use string_enum;

pub(crate) fn unknown_value(entity: &str, raw: &str) -> crate::errors::TaskflowError {
    match entity {
        "role" => crate::errors::TaskflowError::InvalidRole {
            role: raw.to_string(),
        },
        _ => crate::errors::TaskflowError::InvalidStatus {
            entity: entity.to_string(),
            status: raw.to_string(),
        },
    }
}

pub mod account;
pub mod activity;
pub mod history;
pub mod quotation_number;
pub mod revision;
pub mod security;
pub mod task_log;
pub mod ticket;
pub mod user;

pub use account::{Account, AccountPatch, AccountStatus, NewAccount};
pub use activity::{Activity, ActivityStatus, NewActivity};
pub use history::{History, NewHistory, QuotationUpdate};
pub use quotation_number::QuotationNumber;
pub use revision::Revision;
pub use security::{PasswordReset, SecurityAlert};
pub use task_log::{TaskLog, TaskLogStatus};
pub use ticket::{NewTicket, Ticket, TicketStatus};
pub use user::{NewUser, ProfilePatch, Role, User, UserProfile, UserStatus};
