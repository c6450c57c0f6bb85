//! Renders the declarative schema into Postgres DDL and applies it.
//!
//! Provisioning is a one-shot bootstrap: every statement is
//! `CREATE TABLE IF NOT EXISTS`, so a second run against an already
//! provisioned store is a no-op and existing data is never touched.

use sqlx::{Pool, Postgres};

use crate::error::ServiceResult;

use super::schema::{self, ColumnSpec, ColumnType, OnDelete, TableSpec};

/// Ensure every declared table exists. Tables are created in declaration
/// order, which `schema::validate` guarantees is parent-before-child.
pub async fn provision(pool: &Pool<Postgres>) -> ServiceResult<()> {
    schema::validate(schema::tables())?;

    for table in schema::tables() {
        let sql = create_table_sql(table);
        log::debug!("provisioning statement:\n{sql}");
        sqlx::query(&sql).execute(pool).await?;
        log::info!("table '{}' is present", table.name);
    }

    Ok(())
}

/// Render one `CREATE TABLE IF NOT EXISTS` statement for a table spec.
pub fn create_table_sql(table: &TableSpec) -> String {
    let mut clauses: Vec<String> = Vec::new();

    for column in table.columns {
        clauses.push(column_sql(table, column));
    }

    for fk in table.foreign_keys {
        let action = match fk.on_delete {
            OnDelete::Restrict => "RESTRICT",
            OnDelete::Cascade => "CASCADE",
        };
        clauses.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
            fk.column, fk.references_table, fk.references_column, action
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        table.name,
        clauses.join(",\n    ")
    )
}

fn column_sql(table: &TableSpec, column: &ColumnSpec) -> String {
    if column.name == table.primary_key {
        return format!(
            "{} INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY",
            column.name
        );
    }

    let mut sql = match column.ty {
        ColumnType::Integer => format!("{} INTEGER", column.name),
        ColumnType::VarChar(len) => format!("{} VARCHAR({})", column.name, len),
        ColumnType::Numeric { precision, scale } => {
            format!("{} NUMERIC({}, {})", column.name, precision, scale)
        }
        ColumnType::Bytes { max } => format!(
            "{} BYTEA CHECK (octet_length({}) <= {})",
            column.name, column.name, max
        ),
        ColumnType::Date => format!("{} DATE", column.name),
        ColumnType::Timestamp => format!("{} TIMESTAMP", column.name),
        ColumnType::Enum { domain } => {
            let quoted: Vec<String> = domain.iter().map(|v| format!("'{v}'")).collect();
            format!(
                "{} VARCHAR(20) CHECK ({} IN ({}))",
                column.name,
                column.name,
                quoted.join(", ")
            )
        }
    };

    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(default) = column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(default);
    }

    sql
}
