use crate::fixture::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub required: bool,
}

/// Destination table of one record kind. The first column is the primary key.
#[derive(Debug)]
pub struct TableSchema {
    pub kind: Kind,
    pub table: &'static str,
    pub columns: &'static [Column],
    /// Columns the registry sorts by when listing rows.
    pub order_by: &'static [&'static str],
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Text,
        required: true,
    }
}

const fn integer(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Integer,
        required: true,
    }
}

pub static EXPORT_TYPE: TableSchema = TableSchema {
    kind: Kind::ExportType,
    table: "export_type",
    columns: &[
        text("pk"),
        text("path"),
        Column {
            name: "record_model",
            ty: ColumnType::Text,
            required: false,
        },
        integer("order"),
        text("label"),
        text("description"),
    ],
    order_by: &["order", "pk"],
};

pub static EXPORT_FILTER: TableSchema = TableSchema {
    kind: Kind::ExportFilter,
    table: "export_filter",
    columns: &[
        text("pk"),
        integer("order"),
        text("label"),
        text("description"),
    ],
    order_by: &["order", "pk"],
};

pub static STATUS: TableSchema = TableSchema {
    kind: Kind::Status,
    table: "export_status",
    columns: &[text("pk"), text("label"), text("description")],
    order_by: &["pk"],
};

pub static ALL: [&TableSchema; 3] = [&EXPORT_TYPE, &EXPORT_FILTER, &STATUS];

impl TableSchema {
    pub fn of(kind: Kind) -> &'static TableSchema {
        match kind {
            Kind::ExportType => &EXPORT_TYPE,
            Kind::ExportFilter => &EXPORT_FILTER,
            Kind::Status => &STATUS,
        }
    }

    pub fn id_name(&self) -> &'static str {
        self.columns[0].name
    }

    pub fn data_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().skip(1)
    }
}
