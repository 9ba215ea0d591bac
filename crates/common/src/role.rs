use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A user's role, normalized once when a profile is ingested.
///
/// The server and older snapshots spell roles inconsistently (`"Admin"`,
/// `"admin"`, `"Head of Department"`, `"hod"`). Everything downstream compares
/// these variants, never raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Hod,
    Admin,
    Staff,
    Faculty,
    /// Any role this client does not know about, trimmed and lower-cased.
    Other(String),
}

impl Role {
    /// Parse a role string case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "hod" | "head of department" => Self::Hod,
            "admin" => Self::Admin,
            "staff" => Self::Staff,
            "faculty" => Self::Faculty,
            _ => Self::Other(normalized),
        }
    }

    /// Canonical wire spelling, as the API stores it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hod => "hod",
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Faculty => "faculty",
            Self::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Hod => "Head of Department",
            Self::Admin => "Admin",
            Self::Staff => "Staff",
            Self::Faculty => "Faculty",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
