//! Restriction kinds and the reservation processed flag.

use serde::{Deserialize, Serialize};

/// Why a room is blocked for a date range.
///
/// Stored as an integer column on `room_restrictions`. `Reservation`
/// restrictions carry a `reservation_id`; the other kinds stand alone
/// (maintenance closures, the owner keeping a room back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Blocked by a confirmed guest reservation.
    #[default]
    Reservation,
    /// Blocked for maintenance work.
    Maintenance,
    /// Held back by the owner.
    OwnerBlock,
}

impl RestrictionKind {
    /// Integer value stored in the database.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Reservation => 1,
            Self::Maintenance => 2,
            Self::OwnerBlock => 3,
        }
    }

    /// Map a stored integer back to a kind. Unknown values return `None`.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Reservation),
            2 => Some(Self::Maintenance),
            3 => Some(Self::OwnerBlock),
            _ => None,
        }
    }

    /// Human-readable label for admin views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reservation => "Reservation",
            Self::Maintenance => "Maintenance",
            Self::OwnerBlock => "Owner block",
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for RestrictionKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for RestrictionKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Self::from_i32(raw).ok_or_else(|| format!("unknown restriction kind {raw}").into())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for RestrictionKind {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_i32(), buf)
    }
}

/// Admin bookkeeping marker on a reservation: 0 = new, 1 = processed.
///
/// The column is an integer for historical reasons; this wrapper keeps the
/// 0/1 convention out of handler code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ProcessedFlag(bool);

impl ProcessedFlag {
    /// Marker for a reservation awaiting review.
    pub const NEW: Self = Self(false);
    /// Marker for a reservation an admin has handled.
    pub const PROCESSED: Self = Self(true);

    /// Whether the reservation has been processed.
    #[must_use]
    pub const fn is_processed(self) -> bool {
        self.0
    }

    /// The opposite marker, for the admin toggle action.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self(!self.0)
    }

    /// Integer value stored in the database (0 or 1).
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        if self.0 { 1 } else { 0 }
    }

    /// Map a stored integer back to a flag; anything nonzero is processed.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        Self(value != 0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ProcessedFlag {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ProcessedFlag {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_i32(raw))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ProcessedFlag {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_i32(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restriction_kind_integer_mapping() {
        for kind in [
            RestrictionKind::Reservation,
            RestrictionKind::Maintenance,
            RestrictionKind::OwnerBlock,
        ] {
            assert_eq!(RestrictionKind::from_i32(kind.as_i32()), Some(kind));
        }
        assert_eq!(RestrictionKind::from_i32(0), None);
        assert_eq!(RestrictionKind::from_i32(99), None);
    }

    #[test]
    fn test_processed_flag() {
        assert!(!ProcessedFlag::NEW.is_processed());
        assert!(ProcessedFlag::PROCESSED.is_processed());
        assert_eq!(ProcessedFlag::NEW.as_i32(), 0);
        assert_eq!(ProcessedFlag::PROCESSED.as_i32(), 1);
        assert_eq!(ProcessedFlag::from_i32(1), ProcessedFlag::PROCESSED);
        assert_eq!(ProcessedFlag::from_i32(0), ProcessedFlag::NEW);
        assert_eq!(ProcessedFlag::NEW.toggled(), ProcessedFlag::PROCESSED);
    }
}
