//! Database handle and typed lifecycle operations.
//!
//! `Database` owns the connection pool and exposes, per entity, the
//! `store_* / get_*_by_id / delete_*` surface. `store_*` treats id 0 as an
//! insert (returning the entity with its assigned id) and any other id as an
//! update of the non-key columns.
//!
//! Enum columns are typed on this side of the boundary, so out-of-domain
//! values are unrepresentable here; the CHECK constraints created during
//! provisioning catch writers that bypass this module.

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Customer, DiningTable, MenuItem, Order, OrderItem, Payment, Reservation, Staff,
    MAX_IMAGE_BYTES,
};

pub mod provision;
pub mod schema;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    /// Connect to the store described by `config`. Connectivity failures
    /// surface immediately; there is no retry.
    pub async fn connect(config: &Config) -> ServiceResult<Database> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url())
            .await
            .map_err(ServiceError::Connection)?;

        Ok(Database { pool })
    }

    /// Wrap an existing pool, e.g. one injected by the test harness.
    pub fn from_pool(pool: Pool<Postgres>) -> Database {
        Database { pool }
    }

    /// Ensure all declared tables exist. Idempotent.
    pub async fn provision(&self) -> ServiceResult<()> {
        provision::provision(&self.pool).await
    }

    pub async fn store_customer(&self, mut customer: Customer) -> ServiceResult<Customer> {
        check_image_size("profile image", &customer.profile_image)?;

        if customer.id == 0 {
            let row = sqlx::query(
                "INSERT INTO customers (name, contact, email, address, profile_image) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING customer_id",
            )
            .bind(&customer.name)
            .bind(&customer.contact)
            .bind(&customer.email)
            .bind(&customer.address)
            .bind(&customer.profile_image)
            .fetch_one(&self.pool)
            .await?;
            customer.id = row.try_get("customer_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE customers SET name = $2, contact = $3, email = $4, address = $5, \
                 profile_image = $6 WHERE customer_id = $1",
            )
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.contact)
            .bind(&customer.email)
            .bind(&customer.address)
            .bind(&customer.profile_image)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(customer)
    }

    pub async fn get_customer_by_id(&self, id: i32) -> ServiceResult<Option<Customer>> {
        let row = sqlx::query(
            "SELECT customer_id, name, contact, email, address, profile_image \
             FROM customers WHERE customer_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(customer_from_row).transpose()
    }

    pub async fn delete_customer(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_staff(&self, mut staff: Staff) -> ServiceResult<Staff> {
        if staff.id == 0 {
            let row = sqlx::query(
                "INSERT INTO staff (name, role, contact, salary) \
                 VALUES ($1, $2, $3, $4) RETURNING staff_id",
            )
            .bind(&staff.name)
            .bind(staff.role.as_str())
            .bind(&staff.contact)
            .bind(staff.salary)
            .fetch_one(&self.pool)
            .await?;
            staff.id = row.try_get("staff_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE staff SET name = $2, role = $3, contact = $4, salary = $5 \
                 WHERE staff_id = $1",
            )
            .bind(staff.id)
            .bind(&staff.name)
            .bind(staff.role.as_str())
            .bind(&staff.contact)
            .bind(staff.salary)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(staff)
    }

    pub async fn get_staff_by_id(&self, id: i32) -> ServiceResult<Option<Staff>> {
        let row = sqlx::query(
            "SELECT staff_id, name, role, contact, salary FROM staff WHERE staff_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(staff_from_row).transpose()
    }

    pub async fn delete_staff(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM staff WHERE staff_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_menu_item(&self, mut item: MenuItem) -> ServiceResult<MenuItem> {
        check_image_size("menu image", &item.image)?;

        if item.id == 0 {
            let row = sqlx::query(
                "INSERT INTO menu_items (name, description, price, category, image) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING item_id",
            )
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.category.as_str())
            .bind(&item.image)
            .fetch_one(&self.pool)
            .await?;
            item.id = row.try_get("item_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE menu_items SET name = $2, description = $3, price = $4, \
                 category = $5, image = $6 WHERE item_id = $1",
            )
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.category.as_str())
            .bind(&item.image)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(item)
    }

    pub async fn get_menu_item_by_id(&self, id: i32) -> ServiceResult<Option<MenuItem>> {
        let row = sqlx::query(
            "SELECT item_id, name, description, price, category, image \
             FROM menu_items WHERE item_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(menu_item_from_row).transpose()
    }

    pub async fn delete_menu_item(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE item_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_dining_table(&self, mut table: DiningTable) -> ServiceResult<DiningTable> {
        if table.id == 0 {
            let row = sqlx::query(
                "INSERT INTO dining_tables (capacity, status) VALUES ($1, $2) RETURNING table_id",
            )
            .bind(table.capacity)
            .bind(table.status.as_str())
            .fetch_one(&self.pool)
            .await?;
            table.id = row.try_get("table_id")?;
        } else {
            let result =
                sqlx::query("UPDATE dining_tables SET capacity = $2, status = $3 WHERE table_id = $1")
                    .bind(table.id)
                    .bind(table.capacity)
                    .bind(table.status.as_str())
                    .execute(&self.pool)
                    .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(table)
    }

    pub async fn get_dining_table_by_id(&self, id: i32) -> ServiceResult<Option<DiningTable>> {
        let row = sqlx::query("SELECT table_id, capacity, status FROM dining_tables WHERE table_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(dining_table_from_row).transpose()
    }

    pub async fn delete_dining_table(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM dining_tables WHERE table_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_reservation(&self, mut reservation: Reservation) -> ServiceResult<Reservation> {
        if reservation.id == 0 {
            let row = sqlx::query(
                "INSERT INTO reservations (customer_id, table_id, date_time, status) \
                 VALUES ($1, $2, $3, $4) RETURNING reservation_id",
            )
            .bind(reservation.customer_id)
            .bind(reservation.table_id)
            .bind(reservation.date_time)
            .bind(reservation.status.as_str())
            .fetch_one(&self.pool)
            .await?;
            reservation.id = row.try_get("reservation_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE reservations SET customer_id = $2, table_id = $3, date_time = $4, \
                 status = $5 WHERE reservation_id = $1",
            )
            .bind(reservation.id)
            .bind(reservation.customer_id)
            .bind(reservation.table_id)
            .bind(reservation.date_time)
            .bind(reservation.status.as_str())
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(reservation)
    }

    pub async fn get_reservation_by_id(&self, id: i32) -> ServiceResult<Option<Reservation>> {
        let row = sqlx::query(
            "SELECT reservation_id, customer_id, table_id, date_time, status \
             FROM reservations WHERE reservation_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(reservation_from_row).transpose()
    }

    pub async fn delete_reservation(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_order(&self, mut order: Order) -> ServiceResult<Order> {
        if order.id == 0 {
            let row = sqlx::query(
                "INSERT INTO orders (customer_id, table_id, staff_id, status, order_date) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING order_id",
            )
            .bind(order.customer_id)
            .bind(order.table_id)
            .bind(order.staff_id)
            .bind(order.status.as_str())
            .bind(order.order_date)
            .fetch_one(&self.pool)
            .await?;
            order.id = row.try_get("order_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE orders SET customer_id = $2, table_id = $3, staff_id = $4, \
                 status = $5, order_date = $6 WHERE order_id = $1",
            )
            .bind(order.id)
            .bind(order.customer_id)
            .bind(order.table_id)
            .bind(order.staff_id)
            .bind(order.status.as_str())
            .bind(order.order_date)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(order)
    }

    pub async fn get_order_by_id(&self, id: i32) -> ServiceResult<Option<Order>> {
        let row = sqlx::query(
            "SELECT order_id, customer_id, table_id, staff_id, status, order_date \
             FROM orders WHERE order_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(order_from_row).transpose()
    }

    /// Delete an order. Its order items go with it; payments referencing the
    /// order block the delete.
    pub async fn delete_order(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_order_item(&self, mut item: OrderItem) -> ServiceResult<OrderItem> {
        if item.id == 0 {
            let row = sqlx::query(
                "INSERT INTO order_items (order_id, item_id, quantity, subtotal) \
                 VALUES ($1, $2, $3, $4) RETURNING order_item_id",
            )
            .bind(item.order_id)
            .bind(item.item_id)
            .bind(item.quantity)
            .bind(item.subtotal)
            .fetch_one(&self.pool)
            .await?;
            item.id = row.try_get("order_item_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE order_items SET order_id = $2, item_id = $3, quantity = $4, \
                 subtotal = $5 WHERE order_item_id = $1",
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.item_id)
            .bind(item.quantity)
            .bind(item.subtotal)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(item)
    }

    pub async fn get_order_item_by_id(&self, id: i32) -> ServiceResult<Option<OrderItem>> {
        let row = sqlx::query(
            "SELECT order_item_id, order_id, item_id, quantity, subtotal \
             FROM order_items WHERE order_item_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(order_item_from_row).transpose()
    }

    pub async fn get_order_items_by_order(&self, order_id: i32) -> ServiceResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            "SELECT order_item_id, order_id, item_id, quantity, subtotal \
             FROM order_items WHERE order_id = $1 ORDER BY order_item_id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(order_item_from_row).collect()
    }

    pub async fn delete_order_item(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM order_items WHERE order_item_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    pub async fn store_payment(&self, mut payment: Payment) -> ServiceResult<Payment> {
        if payment.id == 0 {
            let row = sqlx::query(
                "INSERT INTO payments (order_id, amount, method, date, status) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING payment_id",
            )
            .bind(payment.order_id)
            .bind(payment.amount)
            .bind(payment.method.as_str())
            .bind(payment.date)
            .bind(payment.status.as_str())
            .fetch_one(&self.pool)
            .await?;
            payment.id = row.try_get("payment_id")?;
        } else {
            let result = sqlx::query(
                "UPDATE payments SET order_id = $2, amount = $3, method = $4, date = $5, \
                 status = $6 WHERE payment_id = $1",
            )
            .bind(payment.id)
            .bind(payment.order_id)
            .bind(payment.amount)
            .bind(payment.method.as_str())
            .bind(payment.date)
            .bind(payment.status.as_str())
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(ServiceError::NotFound);
            }
        }

        Ok(payment)
    }

    pub async fn get_payment_by_id(&self, id: i32) -> ServiceResult<Option<Payment>> {
        let row = sqlx::query(
            "SELECT payment_id, order_id, amount, method, date, status \
             FROM payments WHERE payment_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(payment_from_row).transpose()
    }

    pub async fn delete_payment(&self, id: i32) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM payments WHERE payment_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}

fn check_image_size(what: &str, payload: &[u8]) -> ServiceResult<()> {
    if payload.len() > MAX_IMAGE_BYTES {
        return Err(ServiceError::InvalidInput(format!(
            "{what} is {} bytes, the limit is {MAX_IMAGE_BYTES}",
            payload.len()
        )));
    }
    Ok(())
}

fn customer_from_row(row: &PgRow) -> ServiceResult<Customer> {
    Ok(Customer {
        id: row.try_get("customer_id")?,
        name: row.try_get("name")?,
        contact: row.try_get("contact")?,
        email: row.try_get("email")?,
        address: row.try_get("address")?,
        profile_image: row.try_get("profile_image")?,
    })
}

fn staff_from_row(row: &PgRow) -> ServiceResult<Staff> {
    Ok(Staff {
        id: row.try_get("staff_id")?,
        name: row.try_get("name")?,
        role: row.try_get::<String, _>("role")?.parse()?,
        contact: row.try_get("contact")?,
        salary: row.try_get("salary")?,
    })
}

fn menu_item_from_row(row: &PgRow) -> ServiceResult<MenuItem> {
    Ok(MenuItem {
        id: row.try_get("item_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category: row.try_get::<String, _>("category")?.parse()?,
        image: row.try_get("image")?,
    })
}

fn dining_table_from_row(row: &PgRow) -> ServiceResult<DiningTable> {
    Ok(DiningTable {
        id: row.try_get("table_id")?,
        capacity: row.try_get("capacity")?,
        status: row.try_get::<String, _>("status")?.parse()?,
    })
}

fn reservation_from_row(row: &PgRow) -> ServiceResult<Reservation> {
    Ok(Reservation {
        id: row.try_get("reservation_id")?,
        customer_id: row.try_get("customer_id")?,
        table_id: row.try_get("table_id")?,
        date_time: row.try_get("date_time")?,
        status: row.try_get::<String, _>("status")?.parse()?,
    })
}

fn order_from_row(row: &PgRow) -> ServiceResult<Order> {
    Ok(Order {
        id: row.try_get("order_id")?,
        customer_id: row.try_get("customer_id")?,
        table_id: row.try_get("table_id")?,
        staff_id: row.try_get("staff_id")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        order_date: row.try_get("order_date")?,
    })
}

fn order_item_from_row(row: &PgRow) -> ServiceResult<OrderItem> {
    Ok(OrderItem {
        id: row.try_get("order_item_id")?,
        order_id: row.try_get("order_id")?,
        item_id: row.try_get("item_id")?,
        quantity: row.try_get("quantity")?,
        subtotal: row.try_get("subtotal")?,
    })
}

fn payment_from_row(row: &PgRow) -> ServiceResult<Payment> {
    Ok(Payment {
        id: row.try_get("payment_id")?,
        order_id: row.try_get("order_id")?,
        amount: row.try_get("amount")?,
        method: row.try_get::<String, _>("method")?.parse()?,
        date: row.try_get("date")?,
        status: row.try_get::<String, _>("status")?.parse()?,
    })
}
