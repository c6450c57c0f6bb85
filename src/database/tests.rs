use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{ConstraintKind, ServiceError};
use crate::models::{
    Customer, DiningTable, MenuCategory, MenuItem, Order, OrderItem, OrderStatus, Payment,
    PaymentMethod, PaymentStatus, Reservation, ReservationStatus, Staff, StaffRole, TableStatus,
    MAX_IMAGE_BYTES,
};

use super::Database;

async fn setup(pool: PgPool) -> Database {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::from_pool(pool);
    db.provision().await.unwrap();
    db
}

fn customer(email: &str) -> Customer {
    Customer {
        id: 0,
        name: "John Doe".to_string(),
        contact: "555-0100".to_string(),
        email: email.to_string(),
        address: "1 Main St".to_string(),
        profile_image: vec![0xFF, 0xD8, 0xFF],
    }
}

fn waiter() -> Staff {
    Staff {
        id: 0,
        name: "Jane Roe".to_string(),
        role: StaffRole::Waiter,
        contact: "555-0101".to_string(),
        salary: Decimal::new(245_000, 2),
    }
}

fn menu_item(name: &str) -> MenuItem {
    MenuItem {
        id: 0,
        name: name.to_string(),
        description: "house special".to_string(),
        price: Decimal::new(1_250, 2),
        category: MenuCategory::MainCourse,
        image: vec![0xFF, 0xD8, 0xFF],
    }
}

fn four_top() -> DiningTable {
    DiningTable {
        id: 0,
        capacity: 4,
        status: TableStatus::Available,
    }
}

/// Creates one customer, one waiter, one table, one menu item and an open
/// order across them, returning the order.
async fn open_order(db: &Database, email: &str) -> Order {
    let customer = db.store_customer(customer(email)).await.unwrap();
    let staff = db.store_staff(waiter()).await.unwrap();
    let table = db.store_dining_table(four_top()).await.unwrap();

    db.store_order(Order {
        id: 0,
        customer_id: customer.id,
        table_id: table.id,
        staff_id: staff.id,
        status: OrderStatus::Pending,
        order_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
    })
    .await
    .unwrap()
}

#[sqlx::test(migrations = false)]
async fn provision_creates_all_tables_and_is_idempotent(pool: PgPool) {
    let db = setup(pool).await;

    // Second and third runs must succeed without touching anything.
    db.provision().await.unwrap();
    db.provision().await.unwrap();

    let rows = sqlx::query_scalar::<_, String>(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = 'public' ORDER BY table_name",
    )
    .fetch_all(&db.pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            "customers",
            "dining_tables",
            "menu_items",
            "order_items",
            "orders",
            "payments",
            "reservations",
            "staff",
        ]
    );
}

#[sqlx::test(migrations = false)]
async fn reprovisioning_preserves_existing_rows(pool: PgPool) {
    let db = setup(pool).await;

    let stored = db.store_customer(customer("jd@example.org")).await.unwrap();
    assert!(stored.id != 0);

    db.provision().await.unwrap();

    let fetched = db.get_customer_by_id(stored.id).await.unwrap();
    assert_eq!(fetched, Some(stored));
}

#[sqlx::test(migrations = false)]
async fn store_with_nonzero_id_updates_non_key_columns(pool: PgPool) {
    let db = setup(pool).await;

    let mut stored = db.store_customer(customer("jd@example.org")).await.unwrap();
    stored.name = "John Q. Doe".to_string();
    stored.address = "2 Side St".to_string();

    let updated = db.store_customer(stored.clone()).await.unwrap();
    assert_eq!(updated, stored);
    assert_eq!(db.get_customer_by_id(stored.id).await.unwrap(), Some(stored));

    let err = db
        .store_customer(Customer {
            id: 999_999,
            ..customer("y@example.org")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}

#[sqlx::test(migrations = false)]
async fn out_of_domain_enum_writes_are_rejected_by_the_store(pool: PgPool) {
    let db = setup(pool).await;

    // The typed API cannot express this value, so go through raw SQL the way
    // a foreign writer would.
    let result = sqlx::query(
        "INSERT INTO menu_items (name, description, price, category, image) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind("Tiramisu")
    .bind("classic")
    .bind(Decimal::new(650, 2))
    .bind("Dessert-typo")
    .bind(Vec::<u8>::new())
    .execute(&db.pool)
    .await;

    let err = ServiceError::from(result.unwrap_err());
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::Check,
            ..
        }
    ));
}

#[sqlx::test(migrations = false)]
async fn deleting_an_order_cascades_to_its_items(pool: PgPool) {
    let db = setup(pool).await;

    let order = open_order(&db, "jd@example.org").await;
    let dish = db.store_menu_item(menu_item("Ratatouille")).await.unwrap();

    let first = db
        .store_order_item(OrderItem {
            id: 0,
            order_id: order.id,
            item_id: dish.id,
            quantity: 2,
            subtotal: Decimal::new(2_500, 2),
        })
        .await
        .unwrap();
    let second = db
        .store_order_item(OrderItem {
            id: 0,
            order_id: order.id,
            item_id: dish.id,
            quantity: 1,
            subtotal: Decimal::new(1_250, 2),
        })
        .await
        .unwrap();
    assert_eq!(
        db.get_order_items_by_order(order.id).await.unwrap(),
        vec![first.clone(), second.clone()]
    );

    db.delete_order(order.id).await.unwrap();

    assert_eq!(db.get_order_by_id(order.id).await.unwrap(), None);
    assert_eq!(db.get_order_item_by_id(first.id).await.unwrap(), None);
    assert_eq!(db.get_order_item_by_id(second.id).await.unwrap(), None);
    // The menu item itself is untouched.
    assert_eq!(db.get_menu_item_by_id(dish.id).await.unwrap(), Some(dish));
}

#[sqlx::test(migrations = false)]
async fn deleting_a_referenced_customer_is_rejected(pool: PgPool) {
    let db = setup(pool).await;

    let order = open_order(&db, "jd@example.org").await;

    let err = db.delete_customer(order.customer_id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));

    // The customer and the order both survive the rejected delete.
    assert!(db
        .get_customer_by_id(order.customer_id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(db.get_order_by_id(order.id).await.unwrap(), Some(order));
}

#[sqlx::test(migrations = false)]
async fn deleting_an_order_with_payments_is_rejected(pool: PgPool) {
    let db = setup(pool).await;

    let order = open_order(&db, "jd@example.org").await;
    db.store_payment(Payment {
        id: 0,
        order_id: order.id,
        amount: Decimal::new(3_750, 2),
        method: PaymentMethod::Card,
        date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        status: PaymentStatus::Confirmed,
    })
    .await
    .unwrap();

    let err = db.delete_order(order.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
}

#[sqlx::test(migrations = false)]
async fn duplicate_customer_email_is_rejected(pool: PgPool) {
    let db = setup(pool).await;

    db.store_customer(customer("jd@example.org")).await.unwrap();
    let err = db
        .store_customer(customer("jd@example.org"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        }
    ));
}

#[sqlx::test(migrations = false)]
async fn order_items_require_an_order_and_a_menu_item(pool: PgPool) {
    let db = setup(pool).await;

    let result = sqlx::query(
        "INSERT INTO order_items (order_id, item_id, quantity, subtotal) \
         VALUES (NULL, NULL, 1, $1)",
    )
    .bind(Decimal::new(1_000, 2))
    .execute(&db.pool)
    .await;

    let err = ServiceError::from(result.unwrap_err());
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::NotNull,
            ..
        }
    ));

    // A dangling foreign key is rejected as well.
    let order = open_order(&db, "jd@example.org").await;
    let err = db
        .store_order_item(OrderItem {
            id: 0,
            order_id: order.id,
            item_id: 999_999,
            quantity: 1,
            subtotal: Decimal::new(1_000, 2),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
}

#[sqlx::test(migrations = false)]
async fn oversized_profile_image_is_rejected(pool: PgPool) {
    let db = setup(pool).await;

    let mut big = customer("jd@example.org");
    big.profile_image = vec![0u8; MAX_IMAGE_BYTES + 1];

    // Rejected at the boundary, before any SQL is issued.
    let err = db.store_customer(big).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    // The store itself enforces the bound for writers that bypass the
    // typed API.
    let result = sqlx::query(
        "INSERT INTO customers (name, contact, email, address, profile_image) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind("John Doe")
    .bind("555-0100")
    .bind("jd@example.org")
    .bind("1 Main St")
    .bind(vec![0u8; MAX_IMAGE_BYTES + 1])
    .execute(&db.pool)
    .await;
    let err = ServiceError::from(result.unwrap_err());
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::Check,
            ..
        }
    ));

    // Exactly at the bound is accepted.
    let mut max = customer("jd@example.org");
    max.profile_image = vec![0u8; MAX_IMAGE_BYTES];
    db.store_customer(max).await.unwrap();
}

#[sqlx::test(migrations = false)]
async fn reservation_lifecycle_and_table_restrict(pool: PgPool) {
    let db = setup(pool).await;

    let guest = db.store_customer(customer("jd@example.org")).await.unwrap();
    let table = db.store_dining_table(four_top()).await.unwrap();

    let mut reservation = db
        .store_reservation(Reservation {
            id: 0,
            customer_id: guest.id,
            table_id: table.id,
            date_time: NaiveDate::from_ymd_opt(2024, 5, 17)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap(),
            status: ReservationStatus::Pending,
        })
        .await
        .unwrap();
    assert!(reservation.id != 0);

    reservation.status = ReservationStatus::Confirmed;
    let reservation = db.store_reservation(reservation).await.unwrap();
    assert_eq!(
        db.get_reservation_by_id(reservation.id).await.unwrap(),
        Some(reservation.clone())
    );

    let err = db.delete_dining_table(table.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));

    db.delete_reservation(reservation.id).await.unwrap();
    db.delete_dining_table(table.id).await.unwrap();
}

#[sqlx::test(migrations = false)]
async fn staff_round_trips_role_and_salary(pool: PgPool) {
    let db = setup(pool).await;

    let mut chef = waiter();
    chef.role = StaffRole::Chef;
    chef.salary = Decimal::new(312_575, 2);

    let chef = db.store_staff(chef).await.unwrap();
    let fetched = db.get_staff_by_id(chef.id).await.unwrap();
    assert_eq!(fetched, Some(chef.clone()));

    db.delete_staff(chef.id).await.unwrap();
    assert_eq!(db.get_staff_by_id(chef.id).await.unwrap(), None);
}
