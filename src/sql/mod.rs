//! SQL generation for the lookup tables
//!
//! Statements are rendered from [`TableSchema`] so that the three tables share
//! one code path. Identifiers are always quoted because `order` is a keyword.

use std::fmt::Write as _;

use itertools::Itertools;

use crate::schema::TableSchema;

mod ddl;
mod select;
mod upsert;

pub(crate) fn quote(out: &mut String, name: &str) -> std::fmt::Result {
    write!(out, "\"{name}\"")
}

/// Write a comma-separated list of quoted column names.
pub(crate) fn write_columns<'a>(
    out: &mut String,
    names: impl IntoIterator<Item = &'a str>,
) -> std::fmt::Result {
    write!(
        out,
        "{}",
        names.into_iter().map(|name| format!("\"{name}\"")).join(", ")
    )
}

pub fn ddl(schemas: &[&TableSchema]) -> String {
    let mut out = String::new();
    ddl::generate(&mut out, schemas).unwrap();
    out
}

pub fn upsert(schema: &TableSchema) -> String {
    let mut out = String::new();
    upsert::generate(&mut out, schema).unwrap();
    out
}

pub fn select_all(schema: &TableSchema) -> String {
    let mut out = String::new();
    select::generate(&mut out, schema, false).unwrap();
    out
}

pub fn select_by_id(schema: &TableSchema) -> String {
    let mut out = String::new();
    select::generate(&mut out, schema, true).unwrap();
    out
}
