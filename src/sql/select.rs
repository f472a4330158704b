use std::fmt::Write as _;

use crate::schema::TableSchema;

use super::{quote, write_columns};

pub fn generate(out: &mut String, schema: &TableSchema, by_id: bool) -> std::fmt::Result {
    write!(out, "SELECT ")?;
    write_columns(out, schema.columns.iter().map(|c| c.name))?;
    writeln!(out)?;
    writeln!(out, "FROM {}", schema.table)?;
    if by_id {
        write!(out, "WHERE ")?;
        quote(out, schema.id_name())?;
        writeln!(out, " = ?")?;
    } else {
        write!(out, "ORDER BY ")?;
        write_columns(out, schema.order_by.iter().copied())?;
        writeln!(out)?;
    }
    Ok(())
}
