//! Field validation and type checking
//!
//! Every check consumes the field it inspects so that whatever remains in the
//! payload afterwards is reported as unexpected.

use serde_json::{Map, Value};

use crate::{Error, ErrorContext, ErrorDetail};

use super::{
    Kind,
    types::{ExportFilter, ExportType, JobStatus, NO_RECORD_MODEL, Record},
};

macro_rules! bail {
    ($ctx:expr, $detail:expr) => {
        return Err($ctx.error($detail))
    };
}

pub fn take_string(
    ctx: &ErrorContext,
    fields: &mut Map<String, Value>,
    name: &str,
) -> Result<String, Error> {
    match fields.remove(name) {
        None => bail!(ctx, ErrorDetail::MissingField(name.to_owned())),
        Some(Value::String(string)) if string.trim().is_empty() => {
            bail!(ctx, ErrorDetail::EmptyField(name.to_owned()))
        }
        Some(Value::String(string)) => Ok(string),
        Some(value) => bail!(
            ctx,
            ErrorDetail::TypeMismatch {
                expected: "string",
                got: value,
            }
        ),
    }
}

pub fn take_integer(
    ctx: &ErrorContext,
    fields: &mut Map<String, Value>,
    name: &str,
) -> Result<i64, Error> {
    match fields.remove(name) {
        None => bail!(ctx, ErrorDetail::MissingField(name.to_owned())),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(n) => Ok(n),
            None => bail!(
                ctx,
                ErrorDetail::TypeMismatch {
                    expected: "integer",
                    got: n.into(),
                }
            ),
        },
        Some(value) => bail!(
            ctx,
            ErrorDetail::TypeMismatch {
                expected: "integer",
                got: value,
            }
        ),
    }
}

fn take_object(
    ctx: &ErrorContext,
    fields: &mut Map<String, Value>,
    name: &str,
) -> Result<Map<String, Value>, Error> {
    match fields.remove(name) {
        None => bail!(ctx, ErrorDetail::MissingField(name.to_owned())),
        Some(Value::Object(object)) => Ok(object),
        Some(value) => bail!(
            ctx,
            ErrorDetail::TypeMismatch {
                expected: "object",
                got: value,
            }
        ),
    }
}

fn reject_remaining(ctx: &ErrorContext, fields: Map<String, Value>) -> Result<(), Error> {
    match fields.into_iter().next() {
        Some((name, _)) => bail!(ctx, ErrorDetail::UnexpectedField(name)),
        None => Ok(()),
    }
}

/// Validate one top-level fixture entry and convert it into a typed record.
///
/// The discriminator is checked before the payload, so an entry of an
/// unregistered kind fails with [`ErrorDetail::UnknownKind`] whatever its
/// fields look like.
pub fn record(ctx: &ErrorContext, value: Value) -> Result<Record, Error> {
    let mut entry = match value {
        Value::Object(entry) => entry,
        value => bail!(
            ctx,
            ErrorDetail::TypeMismatch {
                expected: "object",
                got: value,
            }
        ),
    };
    let model = take_string(ctx, &mut entry, "model")?;
    let kind = model
        .parse::<Kind>()
        .map_err(|_| ctx.error(ErrorDetail::UnknownKind(model)))?;
    let pk = take_string(ctx, &mut entry, "pk")?;
    let ctx = &ctx.with_pk(&pk);
    let mut fields = take_object(ctx, &mut entry, "fields")?;
    reject_remaining(ctx, entry)?;

    let record = match kind {
        Kind::ExportType => {
            let path = take_string(ctx, &mut fields, "path")?;
            let record_model = take_string(ctx, &mut fields, "model")?;
            ExportType {
                pk,
                path,
                record_model: (record_model != NO_RECORD_MODEL).then_some(record_model),
                order: take_integer(ctx, &mut fields, "order")?,
                label: take_string(ctx, &mut fields, "label")?,
                description: take_string(ctx, &mut fields, "description")?,
            }
            .into()
        }
        Kind::ExportFilter => ExportFilter {
            pk,
            order: take_integer(ctx, &mut fields, "order")?,
            label: take_string(ctx, &mut fields, "label")?,
            description: take_string(ctx, &mut fields, "description")?,
        }
        .into(),
        Kind::Status => JobStatus {
            pk,
            label: take_string(ctx, &mut fields, "label")?,
            description: take_string(ctx, &mut fields, "description")?,
        }
        .into(),
    };
    reject_remaining(ctx, fields)?;
    Ok(record)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::{ErrorContext, ErrorDetail, ErrorKind};

    use super::{Record, record};

    fn ctx() -> ErrorContext {
        ErrorContext::new("inline.json").with_index(0)
    }

    #[test]
    fn export_type_with_none_model() {
        let value = json!({
            "fields": {
                "path": "export.basic_exporters.LocationsToSolr",
                "model": "None",
                "order": 8,
                "label": "Load locations to Solr",
                "description": "Loads location codes."
            },
            "model": "export.exporttype",
            "pk": "LocationsToSolr"
        });
        let Record::ExportType(row) = record(&ctx(), value).unwrap() else {
            panic!("expected an export type");
        };
        assert_eq!(row.record_model, None);
        assert_eq!(row.order, 8);
        assert_eq!(row.exporter_name(), "LocationsToSolr");
    }

    #[test]
    fn missing_required_field() {
        let value = json!({
            "fields": {"label": "Full export", "description": "Everything."},
            "model": "export.exportfilter",
            "pk": "full_export"
        });
        let err = record(&ctx(), value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(*err.detail, ErrorDetail::MissingField(ref name) if name == "order"));
        assert_eq!(err.context.pk.as_deref(), Some("full_export"));
    }

    #[test]
    fn unknown_kind_wins_over_bad_fields() {
        let value = json!({
            "fields": {},
            "model": "export.exportinstance",
            "pk": "1"
        });
        let err = record(&ctx(), value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKind);
    }

    #[test]
    fn status_rejects_order() {
        let value = json!({
            "fields": {"label": "Waiting", "description": "Queued.", "order": 1},
            "model": "export.status",
            "pk": "waiting"
        });
        let err = record(&ctx(), value).unwrap_err();
        assert!(matches!(*err.detail, ErrorDetail::UnexpectedField(ref name) if name == "order"));
    }

    #[test]
    fn order_must_be_integer() {
        let value = json!({
            "fields": {"order": "2", "label": "Last export", "description": "Since last run."},
            "model": "export.exportfilter",
            "pk": "last_export"
        });
        let err = record(&ctx(), value).unwrap_err();
        assert!(matches!(
            *err.detail,
            ErrorDetail::TypeMismatch { expected: "integer", .. }
        ));

        let value = json!({
            "fields": {"order": 2.5, "label": "Last export", "description": "Since last run."},
            "model": "export.exportfilter",
            "pk": "last_export"
        });
        assert!(record(&ctx(), value).is_err());
    }

    #[test]
    fn empty_label_is_rejected() {
        let value = json!({
            "fields": {"label": "  ", "description": "Done."},
            "model": "export.status",
            "pk": "success"
        });
        let err = record(&ctx(), value).unwrap_err();
        assert!(matches!(*err.detail, ErrorDetail::EmptyField(ref name) if name == "label"));
    }

    #[test]
    fn extra_top_level_key_is_rejected() {
        let value = json!({
            "fields": {"label": "Success", "description": "Done."},
            "model": "export.status",
            "pk": "success",
            "id": 3
        });
        let err = record(&ctx(), value).unwrap_err();
        assert!(matches!(*err.detail, ErrorDetail::UnexpectedField(ref name) if name == "id"));
    }
}
