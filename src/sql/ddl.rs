use std::fmt::Write as _;

use crate::schema::{ColumnType, TableSchema};

use super::quote;

fn sqlite_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::Integer => "INTEGER",
    }
}

pub fn generate(out: &mut String, schemas: &[&TableSchema]) -> std::fmt::Result {
    for schema in schemas {
        writeln!(out, "CREATE TABLE IF NOT EXISTS {} (", schema.table)?;
        for column in schema.columns {
            write!(out, "  ")?;
            quote(out, column.name)?;
            write!(out, " {}", sqlite_type(column.ty))?;
            if column.required {
                writeln!(out, " NOT NULL,")?;
            } else {
                writeln!(out, ",")?;
            }
        }
        write!(out, "  PRIMARY KEY (")?;
        quote(out, schema.id_name())?;
        writeln!(out, ")")?;
        writeln!(out, ");")?;
    }
    Ok(())
}
