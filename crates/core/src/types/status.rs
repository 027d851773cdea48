//! Status enums for orders and user roles.
//!
//! [`OrderStatus`] also carries the transition table used by the admin order
//! view: the set of statuses offered for an order given its current status.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses an admin is offered for an order currently in `self`.
    ///
    /// The current status is always first, so selecting it is a no-op.
    #[must_use]
    pub const fn offered_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Pending, Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Shipped, Self::Delivered],
            Self::Delivered => &[Self::Delivered],
            Self::Cancelled => &[Self::Cancelled],
        }
    }

    /// Whether `next` is in the offered set for `self`.
    #[must_use]
    pub fn offers(self, next: Self) -> bool {
        self.offered_transitions().contains(&next)
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// User permission tier.
///
/// Any role string other than `admin` decodes as [`Role::Customer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    Customer,
    /// Unlocks statistics, order management, and user search.
    Admin,
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        })
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        if s == "admin" {
            Self::Admin
        } else {
            Self::Customer
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}
