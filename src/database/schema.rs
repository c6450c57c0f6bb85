//! Declarative schema for the restaurant point-of-sale data model.
//!
//! Eight tables and their relationships, described independently of any SQL
//! dialect. This module produces no side effects; rendering and execution
//! live in [`super::provision`].
//!
//! Column widths, nullability and numeric precisions follow the legacy
//! schema exactly, including the `Desert` category spelling.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    MenuCategory, OrderStatus, PaymentMethod, PaymentStatus, ReservationStatus, StaffRole,
    TableStatus, MAX_IMAGE_BYTES,
};

/// Semantic column type, mapped to a concrete SQL type by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    VarChar(u32),
    Numeric { precision: u8, scale: u8 },
    /// Binary payload with an upper size bound in bytes.
    Bytes { max: u32 },
    Date,
    Timestamp,
    /// Closed string domain. Writes outside the domain are rejected.
    Enum { domain: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<&'static str>,
}

impl ColumnSpec {
    const fn new(name: &'static str, ty: ColumnType) -> Self {
        ColumnSpec {
            name,
            ty,
            nullable: false,
            unique: false,
            default: None,
        }
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Referential action when the referenced parent row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Reject the delete while child rows exist.
    Restrict,
    /// Delete child rows together with the parent.
    Cascade,
}

#[derive(Debug, Clone, Copy)]
pub struct ForeignKeySpec {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    /// Auto-increment integer primary key. Must name one of `columns`.
    pub primary_key: &'static str,
    pub columns: &'static [ColumnSpec],
    pub foreign_keys: &'static [ForeignKeySpec],
}

const IMAGE: ColumnType = ColumnType::Bytes {
    max: MAX_IMAGE_BYTES as u32,
};

static TABLES: [TableSpec; 8] = [
    TableSpec {
        name: "customers",
        primary_key: "customer_id",
        columns: &[
            ColumnSpec::new("customer_id", ColumnType::Integer),
            ColumnSpec::new("name", ColumnType::VarChar(45)),
            ColumnSpec::new("contact", ColumnType::VarChar(12)),
            ColumnSpec::new("email", ColumnType::VarChar(25)).unique(),
            ColumnSpec::new("address", ColumnType::VarChar(45)),
            ColumnSpec::new("profile_image", IMAGE),
        ],
        foreign_keys: &[],
    },
    TableSpec {
        name: "staff",
        primary_key: "staff_id",
        columns: &[
            ColumnSpec::new("staff_id", ColumnType::Integer),
            ColumnSpec::new("name", ColumnType::VarChar(45)),
            ColumnSpec::new(
                "role",
                ColumnType::Enum {
                    domain: StaffRole::VALUES,
                },
            ),
            ColumnSpec::new("contact", ColumnType::VarChar(45)),
            ColumnSpec::new(
                "salary",
                ColumnType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
        ],
        foreign_keys: &[],
    },
    TableSpec {
        name: "menu_items",
        primary_key: "item_id",
        columns: &[
            ColumnSpec::new("item_id", ColumnType::Integer),
            ColumnSpec::new("name", ColumnType::VarChar(45)),
            ColumnSpec::new("description", ColumnType::VarChar(1200)),
            ColumnSpec::new(
                "price",
                ColumnType::Numeric {
                    precision: 12,
                    scale: 2,
                },
            ),
            ColumnSpec::new(
                "category",
                ColumnType::Enum {
                    domain: MenuCategory::VALUES,
                },
            ),
            ColumnSpec::new("image", IMAGE),
        ],
        foreign_keys: &[],
    },
    TableSpec {
        name: "dining_tables",
        primary_key: "table_id",
        columns: &[
            ColumnSpec::new("table_id", ColumnType::Integer),
            ColumnSpec::new("capacity", ColumnType::Integer),
            ColumnSpec::new(
                "status",
                ColumnType::Enum {
                    domain: TableStatus::VALUES,
                },
            ),
        ],
        foreign_keys: &[],
    },
    TableSpec {
        name: "reservations",
        primary_key: "reservation_id",
        columns: &[
            ColumnSpec::new("reservation_id", ColumnType::Integer),
            ColumnSpec::new("customer_id", ColumnType::Integer),
            ColumnSpec::new("table_id", ColumnType::Integer),
            ColumnSpec::new("date_time", ColumnType::Timestamp),
            ColumnSpec::new(
                "status",
                ColumnType::Enum {
                    domain: ReservationStatus::VALUES,
                },
            ),
        ],
        foreign_keys: &[
            ForeignKeySpec {
                column: "customer_id",
                references_table: "customers",
                references_column: "customer_id",
                on_delete: OnDelete::Restrict,
            },
            ForeignKeySpec {
                column: "table_id",
                references_table: "dining_tables",
                references_column: "table_id",
                on_delete: OnDelete::Restrict,
            },
        ],
    },
    TableSpec {
        name: "orders",
        primary_key: "order_id",
        columns: &[
            ColumnSpec::new("order_id", ColumnType::Integer),
            ColumnSpec::new("customer_id", ColumnType::Integer),
            ColumnSpec::new("table_id", ColumnType::Integer),
            ColumnSpec::new("staff_id", ColumnType::Integer),
            ColumnSpec::new(
                "status",
                ColumnType::Enum {
                    domain: OrderStatus::VALUES,
                },
            ),
            ColumnSpec::new("order_date", ColumnType::Date),
        ],
        foreign_keys: &[
            ForeignKeySpec {
                column: "customer_id",
                references_table: "customers",
                references_column: "customer_id",
                on_delete: OnDelete::Restrict,
            },
            ForeignKeySpec {
                column: "table_id",
                references_table: "dining_tables",
                references_column: "table_id",
                on_delete: OnDelete::Restrict,
            },
            ForeignKeySpec {
                column: "staff_id",
                references_table: "staff",
                references_column: "staff_id",
                on_delete: OnDelete::Restrict,
            },
        ],
    },
    TableSpec {
        name: "order_items",
        primary_key: "order_item_id",
        columns: &[
            ColumnSpec::new("order_item_id", ColumnType::Integer),
            ColumnSpec::new("order_id", ColumnType::Integer),
            ColumnSpec::new("item_id", ColumnType::Integer),
            ColumnSpec::new("quantity", ColumnType::Integer),
            ColumnSpec::new(
                "subtotal",
                ColumnType::Numeric {
                    precision: 12,
                    scale: 2,
                },
            ),
        ],
        foreign_keys: &[
            // The only cascading edge in the model: order items share the
            // lifecycle of their order.
            ForeignKeySpec {
                column: "order_id",
                references_table: "orders",
                references_column: "order_id",
                on_delete: OnDelete::Cascade,
            },
            ForeignKeySpec {
                column: "item_id",
                references_table: "menu_items",
                references_column: "item_id",
                on_delete: OnDelete::Restrict,
            },
        ],
    },
    TableSpec {
        name: "payments",
        primary_key: "payment_id",
        columns: &[
            ColumnSpec::new("payment_id", ColumnType::Integer),
            ColumnSpec::new("order_id", ColumnType::Integer),
            ColumnSpec::new(
                "amount",
                ColumnType::Numeric {
                    precision: 12,
                    scale: 2,
                },
            ),
            ColumnSpec::new(
                "method",
                ColumnType::Enum {
                    domain: PaymentMethod::VALUES,
                },
            ),
            ColumnSpec::new("date", ColumnType::Date),
            ColumnSpec::new(
                "status",
                ColumnType::Enum {
                    domain: PaymentStatus::VALUES,
                },
            ),
        ],
        foreign_keys: &[ForeignKeySpec {
            column: "order_id",
            references_table: "orders",
            references_column: "order_id",
            on_delete: OnDelete::Restrict,
        }],
    },
];

/// All table specifications in creation order: every foreign-key target
/// precedes the tables referencing it.
pub fn tables() -> &'static [TableSpec] {
    &TABLES
}

/// Look up a table specification by name.
pub fn table(name: &str) -> Option<&'static TableSpec> {
    TABLES.iter().find(|t| t.name == name)
}

/// Check a set of table specifications for definition conflicts: duplicate
/// table names, primary keys or foreign keys naming unknown columns, and
/// foreign keys whose target is undeclared or declared after the
/// referencing table.
pub fn validate(tables: &[TableSpec]) -> ServiceResult<()> {
    for (position, table) in tables.iter().enumerate() {
        if tables[..position].iter().any(|t| t.name == table.name) {
            return Err(ServiceError::SchemaDefinition(format!(
                "table '{}' is declared twice",
                table.name
            )));
        }

        if !table.columns.iter().any(|c| c.name == table.primary_key) {
            return Err(ServiceError::SchemaDefinition(format!(
                "table '{}' names unknown primary key column '{}'",
                table.name, table.primary_key
            )));
        }

        for fk in table.foreign_keys {
            if !table.columns.iter().any(|c| c.name == fk.column) {
                return Err(ServiceError::SchemaDefinition(format!(
                    "table '{}' declares a foreign key on unknown column '{}'",
                    table.name, fk.column
                )));
            }

            let target = tables[..position]
                .iter()
                .find(|t| t.name == fk.references_table);
            let target = match target {
                Some(t) => t,
                None => {
                    return Err(ServiceError::SchemaDefinition(format!(
                        "foreign key {}.{} references table '{}' which is not declared earlier",
                        table.name, fk.column, fk.references_table
                    )))
                }
            };

            if !target.columns.iter().any(|c| c.name == fk.references_column) {
                return Err(ServiceError::SchemaDefinition(format!(
                    "foreign key {}.{} references unknown column {}.{}",
                    table.name, fk.column, fk.references_table, fk.references_column
                )));
            }
        }
    }

    Ok(())
}
