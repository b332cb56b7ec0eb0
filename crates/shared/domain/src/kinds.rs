use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Kind of a documented type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Enum,
    Union,
}

impl TypeKind {
    /// The item class used by rustdoc in page names and link classes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
        }
    }

    #[must_use]
    pub const fn flag(self) -> KindSet {
        match self {
            Self::Struct => KindSet::STRUCT,
            Self::Enum => KindSet::ENUM,
            Self::Union => KindSet::UNION,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

bitflags! {
    /// Set of declaration kinds the builder indexes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct KindSet: u8 {
        const STRUCT = 1 << 0;
        const ENUM = 1 << 1;
        const UNION = 1 << 2;

        const ALL = Self::STRUCT.bits() | Self::ENUM.bits() | Self::UNION.bits();
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl KindSet {
    #[must_use]
    pub const fn includes(self, kind: TypeKind) -> bool {
        self.contains(kind.flag())
    }
}

/// Token of a kind list that names no declaration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type kind `{}`, expected struct, enum, union, all or *", self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// Parses a comma list such as `struct, enum`; `all` and `*` select every kind.
impl FromStr for KindSet {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',').map(str::trim).try_fold(Self::empty(), |acc, part| {
            let kind = match part {
                "struct" => Self::STRUCT,
                "enum" => Self::ENUM,
                "union" => Self::UNION,
                "all" | "*" => Self::ALL,
                other => return Err(UnknownKind(other.to_owned())),
            };
            Ok(acc | kind)
        })
    }
}

impl Serialize for KindSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let names: Vec<&str> = [TypeKind::Struct, TypeKind::Enum, TypeKind::Union]
            .into_iter()
            .filter(|k| self.includes(*k))
            .map(TypeKind::as_str)
            .collect();
        serializer.serialize_str(&names.join(","))
    }
}

impl<'de> Deserialize<'de> for KindSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
