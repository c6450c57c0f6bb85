use std::fmt::Debug;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Upper bound for customer and menu images in bytes (2 MiB). Oversized
/// payloads are rejected, never truncated.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum StaffRole {
    Manager,
    Chef,
    Waiter,
    Cashier,
}

impl StaffRole {
    /// Wire strings of the closed role set.
    pub const VALUES: &'static [&'static str] = &["Manager", "Chef", "Waiter", "Cashier"];

    pub fn as_str(self) -> &'static str {
        match self {
            StaffRole::Manager => "Manager",
            StaffRole::Chef => "Chef",
            StaffRole::Waiter => "Waiter",
            StaffRole::Cashier => "Cashier",
        }
    }
}

impl FromStr for StaffRole {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Manager" => Ok(StaffRole::Manager),
            "Chef" => Ok(StaffRole::Chef),
            "Waiter" => Ok(StaffRole::Waiter),
            "Cashier" => Ok(StaffRole::Cashier),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown staff role '{other}'"
            ))),
        }
    }
}

// "Desert" and the space in "Main course" are the exact stored strings of
// the legacy schema and must not be corrected.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum MenuCategory {
    Starter,
    #[serde(rename = "Main course")]
    MainCourse,
    Desert,
    Drink,
}

impl MenuCategory {
    pub const VALUES: &'static [&'static str] = &["Starter", "Main course", "Desert", "Drink"];

    pub fn as_str(self) -> &'static str {
        match self {
            MenuCategory::Starter => "Starter",
            MenuCategory::MainCourse => "Main course",
            MenuCategory::Desert => "Desert",
            MenuCategory::Drink => "Drink",
        }
    }
}

impl FromStr for MenuCategory {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Starter" => Ok(MenuCategory::Starter),
            "Main course" => Ok(MenuCategory::MainCourse),
            "Desert" => Ok(MenuCategory::Desert),
            "Drink" => Ok(MenuCategory::Drink),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown menu category '{other}'"
            ))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TableStatus {
    Available,
    Reserved,
    Occupied,
}

impl TableStatus {
    pub const VALUES: &'static [&'static str] = &["Available", "Reserved", "Occupied"];

    pub fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "Available",
            TableStatus::Reserved => "Reserved",
            TableStatus::Occupied => "Occupied",
        }
    }
}

impl FromStr for TableStatus {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Available" => Ok(TableStatus::Available),
            "Reserved" => Ok(TableStatus::Reserved),
            "Occupied" => Ok(TableStatus::Occupied),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown table status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub const VALUES: &'static [&'static str] = &["Pending", "Confirmed", "Cancelled"];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(ReservationStatus::Pending),
            "Confirmed" => Ok(ReservationStatus::Confirmed),
            "Cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown reservation status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Prepared,
    Served,
    Paid,
}

impl OrderStatus {
    pub const VALUES: &'static [&'static str] = &["Pending", "Prepared", "Served", "Paid"];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Prepared => "Prepared",
            OrderStatus::Served => "Served",
            OrderStatus::Paid => "Paid",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(OrderStatus::Pending),
            "Prepared" => Ok(OrderStatus::Prepared),
            "Served" => Ok(OrderStatus::Served),
            "Paid" => Ok(OrderStatus::Paid),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "CARD")]
    Card,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMethod {
    pub const VALUES: &'static [&'static str] = &["POS", "CARD", "Bank Transfer"];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Pos => "POS",
            PaymentMethod::Card => "CARD",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "POS" => Ok(PaymentMethod::Pos),
            "CARD" => Ok(PaymentMethod::Card),
            "Bank Transfer" => Ok(PaymentMethod::BankTransfer),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

impl PaymentStatus {
    pub const VALUES: &'static [&'static str] = &["Pending", "Confirmed", "Failed"];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Confirmed => "Confirmed",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(PaymentStatus::Pending),
            "Confirmed" => Ok(PaymentStatus::Confirmed),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }
}

#[derive(PartialEq, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub address: String,
    pub profile_image: Vec<u8>,
}

impl Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("contact", &self.contact)
            .field("email", &self.email)
            .field("address", &self.address)
            .field(
                "profile_image",
                &format!("{} bytes", self.profile_image.len()),
            )
            .finish()
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: i32,
    pub name: String,
    pub role: StaffRole,
    pub contact: String,
    pub salary: Decimal,
}

#[derive(PartialEq, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: MenuCategory,
    pub image: Vec<u8>,
}

impl Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("price", &self.price)
            .field("category", &self.category)
            .field("image", &format!("{} bytes", self.image.len()))
            .finish()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i32,
    pub capacity: i32,
    pub status: TableStatus,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub customer_id: i32,
    pub table_id: i32,
    pub date_time: NaiveDateTime,
    pub status: ReservationStatus,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub table_id: i32,
    pub staff_id: i32,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub subtotal: Decimal,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i32,
    pub order_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_strings_round_trip() {
        for value in MenuCategory::VALUES {
            assert_eq!(value.parse::<MenuCategory>().unwrap().as_str(), *value);
        }
        for value in StaffRole::VALUES {
            assert_eq!(value.parse::<StaffRole>().unwrap().as_str(), *value);
        }
        for value in TableStatus::VALUES {
            assert_eq!(value.parse::<TableStatus>().unwrap().as_str(), *value);
        }
        for value in ReservationStatus::VALUES {
            assert_eq!(value.parse::<ReservationStatus>().unwrap().as_str(), *value);
        }
        for value in OrderStatus::VALUES {
            assert_eq!(value.parse::<OrderStatus>().unwrap().as_str(), *value);
        }
        for value in PaymentMethod::VALUES {
            assert_eq!(value.parse::<PaymentMethod>().unwrap().as_str(), *value);
        }
        for value in PaymentStatus::VALUES {
            assert_eq!(value.parse::<PaymentStatus>().unwrap().as_str(), *value);
        }
    }

    #[test]
    fn values_outside_the_domain_are_rejected() {
        assert!("Dessert-typo".parse::<MenuCategory>().is_err());
        assert!("Dessert".parse::<MenuCategory>().is_err());
        assert!("manager".parse::<StaffRole>().is_err());
        assert!("".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn multi_word_values_keep_their_exact_spelling() {
        assert_eq!(MenuCategory::MainCourse.as_str(), "Main course");
        assert_eq!(MenuCategory::Desert.as_str(), "Desert");
        assert_eq!(PaymentMethod::BankTransfer.as_str(), "Bank Transfer");
    }

    #[test]
    fn enums_serialize_with_their_wire_strings() {
        assert_eq!(
            serde_json::to_string(&MenuCategory::MainCourse).unwrap(),
            "\"Main course\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"Bank Transfer\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Pos).unwrap(), "\"POS\"");
        assert_eq!(
            serde_json::to_string(&StaffRole::Waiter).unwrap(),
            "\"Waiter\""
        );
    }

    #[test]
    fn customer_debug_does_not_dump_image_bytes() {
        let customer = Customer {
            id: 1,
            name: "John Doe".to_string(),
            contact: "555-0100".to_string(),
            email: "john.doe@example.org".to_string(),
            address: "1 Main St".to_string(),
            profile_image: vec![0u8; 4096],
        };
        let rendered = format!("{customer:?}");
        assert!(rendered.contains("4096 bytes"));
        assert!(!rendered.contains("0, 0, 0"));
    }
}
