use std::fmt::Write as _;

use crate::schema::TableSchema;

use super::{quote, write_columns};

/// Upsert every row of a JSON array bound as the only parameter.
pub fn generate(out: &mut String, schema: &TableSchema) -> std::fmt::Result {
    write!(out, "INSERT INTO {}(", schema.table)?;
    write_columns(out, schema.columns.iter().map(|c| c.name))?;
    writeln!(out, ")")?;
    writeln!(out, "SELECT")?;
    for (idx, column) in schema.columns.iter().enumerate() {
        write!(out, "  value->>'{}'", column.name)?;
        if idx + 1 < schema.columns.len() {
            writeln!(out, ",")?;
        } else {
            writeln!(out)?;
        }
    }
    writeln!(out, "FROM json_each(?)")?;
    // disambiguates ON CONFLICT from a join constraint
    writeln!(out, "WHERE 1")?;
    write!(out, "ON CONFLICT (")?;
    quote(out, schema.id_name())?;
    writeln!(out, ")")?;
    let data_columns = schema.data_columns().collect::<Vec<_>>();
    if data_columns.is_empty() {
        writeln!(out, "DO NOTHING;")?;
    } else {
        writeln!(out, "DO UPDATE SET")?;
        for (idx, column) in data_columns.iter().enumerate() {
            write!(out, "  ")?;
            quote(out, column.name)?;
            write!(out, " = EXCLUDED.")?;
            quote(out, column.name)?;
            if idx == data_columns.len() - 1 {
                writeln!(out, ";")?;
            } else {
                writeln!(out, ",")?;
            }
        }
    }
    Ok(())
}
