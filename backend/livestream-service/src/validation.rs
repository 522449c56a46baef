//! Field-level validation run before any store mutation
//!
//! Rules are declared on the payload types with `validator` derives; this
//! module turns a `ValidationErrors` report into a single
//! `ServiceError::InvalidField` naming the first offending wire field.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewComment, NewStream, StreamPatch};
use crate::repository::StreamStore;
use validator::{Validate, ValidationError, ValidationErrors};

/// (struct field, wire field) pairs in reporting precedence
const NEW_STREAM_FIELDS: &[(&str, &str)] = &[("title", "title"), ("app_instance", "appInstance")];
const STREAM_PATCH_FIELDS: &[(&str, &str)] = &[("title", "title")];
const NEW_COMMENT_FIELDS: &[(&str, &str)] = &[("content", "content")];

pub const APP_INSTANCE_NOT_UNIQUE: &str = "appInstance must be unique";

/// Rejects strings that are empty after trimming
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn validate_new_stream(fields: &NewStream) -> ServiceResult<()> {
    fields
        .validate()
        .map_err(|errors| to_invalid_field(&errors, NEW_STREAM_FIELDS))
}

pub fn validate_stream_patch(fields: &StreamPatch) -> ServiceResult<()> {
    fields
        .validate()
        .map_err(|errors| to_invalid_field(&errors, STREAM_PATCH_FIELDS))
}

pub fn validate_new_comment(fields: &NewComment) -> ServiceResult<()> {
    fields
        .validate()
        .map_err(|errors| to_invalid_field(&errors, NEW_COMMENT_FIELDS))
}

/// `appInstance` must not be used by any existing stream, live or ended.
///
/// Compare-then-write: not atomic against a concurrent create with the same
/// value unless the store enforces its own constraint.
pub async fn ensure_unique_app_instance(
    store: &dyn StreamStore,
    app_instance: &str,
) -> ServiceResult<()> {
    if store
        .find_stream_by_app_instance(app_instance)
        .await?
        .is_some()
    {
        return Err(ServiceError::invalid_field(
            "appInstance",
            APP_INSTANCE_NOT_UNIQUE,
        ));
    }
    Ok(())
}

fn to_invalid_field(errors: &ValidationErrors, precedence: &[(&str, &str)]) -> ServiceError {
    let field_errors = errors.field_errors();
    for (field, wire_name) in precedence {
        if let Some(failures) = field_errors.get(*field) {
            let code = failures
                .first()
                .map(|failure| failure.code.to_string())
                .unwrap_or_default();
            return ServiceError::invalid_field(*wire_name, message_for(wire_name, &code));
        }
    }

    // Only reachable if a rule is added without a precedence entry
    ServiceError::invalid_field("unknown", errors.to_string())
}

fn message_for(field: &str, code: &str) -> String {
    match code {
        "required" => format!("{field} is required"),
        "length" | "blank" => format!("{field} must not be empty"),
        _ => format!("{field} is invalid"),
    }
}
