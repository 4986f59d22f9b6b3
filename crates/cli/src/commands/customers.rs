//! Customer roster and per-track editing commands.
//!
//! # Usage
//!
//! ```bash
//! vivaha customers list --view no-action --per-page 10
//! vivaha customers show VB-1041
//! vivaha customers set VB-1041 -t payment -f payment_status -v 2
//! vivaha customers set VB-1041 -t payment -f payment_receipt --file r.png
//! vivaha customers set VB-1041 -t payment -f payment_receipt --clear
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use vivaha_backoffice::filters::FilterStore;
use vivaha_backoffice::session::SaveOutcome;
use vivaha_core::composite::{Badge, CompositeStatus};
use vivaha_core::display::{Paginator, color_for_id};
use vivaha_core::filter::FilterState;
use vivaha_core::track::{FieldSpec, Track};
use vivaha_core::{Customer, CustomerId, FieldKind, FieldValue, FileUpload, OptionId, parse_date};

use super::open_roster;

/// Errors specific to argument handling in customer commands.
#[derive(Debug, Error)]
pub enum CustomersError {
    /// The named view does not exist.
    #[error("Invalid view: {0}. Valid views: all, mine, my-employees-requests, payment-approval, no-action")]
    InvalidView(String),

    /// The named track does not exist.
    #[error("Invalid track: {0}. Valid tracks: payment, agreement, settlement")]
    InvalidTrack(String),

    /// The field does not belong to the track.
    #[error("Unknown field `{field}` on {track} track")]
    UnknownField { track: Track, field: String },

    /// The raw value does not parse for the field's kind.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Neither `--value`, `--file`, nor `--clear` was given.
    #[error("Provide --value, --file, or --clear")]
    MissingValue,

    /// The customer is not in the visible roster.
    #[error("Customer not found in the visible roster: {0}")]
    UnknownCustomer(String),

    /// Reading an upload file failed.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What `customers set` should write into the field.
pub struct NewValue {
    pub value: Option<String>,
    pub file: Option<PathBuf>,
    pub clear: bool,
}

/// List customers with their composite badges.
pub async fn list(
    view: Option<&str>,
    search: Option<String>,
    page: usize,
    per_page: usize,
    remember: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (roster, config) = open_roster().await?;
    let store = FilterStore::new(&config.filter_state_path);
    let stored = store.load();

    let view = match view {
        Some(raw) => raw
            .parse()
            .map_err(|_| CustomersError::InvalidView(raw.to_string()))?,
        None => stored.view,
    };
    let filter = FilterState {
        view,
        search: search.or(stored.search),
        page,
    };
    if remember {
        store.save(&filter)?;
    }

    let rows = roster.filtered(&filter).await;
    let pager = Paginator::new(rows.len(), per_page);
    let range = pager.range(filter.page);

    tracing::info!(
        "{} customer(s) in view `{}` (page {}/{})",
        rows.len(),
        filter.view,
        pager.clamp(filter.page) + 1,
        pager.page_count()
    );
    for customer in rows.get(range).unwrap_or_default() {
        let badge = roster.badge(customer).await;
        tracing::info!(
            "  {:<12} {:<24} {:<14} {:<8} {}",
            customer.user_id,
            customer.full_name.as_deref().unwrap_or("-"),
            owner_label(customer),
            color_for_id(customer.user_id.as_str()).as_str(),
            format_badge(&badge)
        );
    }
    Ok(())
}

/// Show one customer's tracks with resolved labels.
pub async fn show(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (roster, _config) = open_roster().await?;
    let id = CustomerId::new(user_id);
    let customer = roster
        .get(&id)
        .ok_or_else(|| CustomersError::UnknownCustomer(user_id.to_string()))?;

    let badge = roster.badge(customer).await;
    tracing::info!(
        "{} {} - {}",
        customer.user_id,
        customer.full_name.as_deref().unwrap_or("-"),
        format_badge(&badge)
    );
    tracing::info!("  assigned to: {}", owner_label(customer));

    for track in Track::ALL {
        tracing::info!("  [{track}]");
        for spec in track.fields() {
            let label = roster
                .lookups()
                .resolve_field(spec, &customer.field(spec.name))
                .await;
            tracing::info!("    {:<24} {}", spec.name, label);
        }
    }
    Ok(())
}

/// Edit one field of one track and save.
pub async fn set(
    user_id: &str,
    track: &str,
    field: &str,
    new_value: NewValue,
) -> Result<(), Box<dyn std::error::Error>> {
    let track: Track = track
        .parse()
        .map_err(|_| CustomersError::InvalidTrack(track.to_string()))?;
    let spec = track.field(field).ok_or_else(|| CustomersError::UnknownField {
        track,
        field: field.to_string(),
    })?;
    let value = resolve_new_value(spec, new_value)?;

    let (mut roster, _config) = open_roster().await?;
    let id = CustomerId::new(user_id);
    let session = roster.select(&id).map_err(|_| {
        CustomersError::UnknownCustomer(user_id.to_string())
    })?;
    session.begin_edit(track)?;
    session.set_field(track, field, value)?;

    match roster.save_track(track).await? {
        SaveOutcome::Saved(updated) => {
            tracing::info!("Saved. Server confirmed {} field(s) for {}", track, updated.user_id);
        }
        SaveOutcome::NoChanges => {
            tracing::info!("No changes - nothing was sent");
        }
    }
    Ok(())
}

fn resolve_new_value(
    spec: &FieldSpec,
    new_value: NewValue,
) -> Result<FieldValue, CustomersError> {
    if new_value.clear {
        return Ok(FieldValue::Null);
    }
    if let Some(path) = new_value.file {
        if spec.kind != FieldKind::File {
            return Err(CustomersError::InvalidValue {
                field: spec.name.to_string(),
                reason: "--file only applies to file fields".to_string(),
            });
        }
        let bytes = std::fs::read(&path).map_err(|source| CustomersError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let filename = path
            .file_name()
            .map_or_else(|| "upload.bin".to_string(), |name| name.to_string_lossy().into_owned());
        return Ok(FieldValue::Upload(FileUpload {
            content_type: guess_content_type(&path).to_string(),
            filename,
            bytes,
        }));
    }
    let raw = new_value.value.ok_or(CustomersError::MissingValue)?;
    parse_value(spec, &raw)
}

fn parse_value(spec: &FieldSpec, raw: &str) -> Result<FieldValue, CustomersError> {
    let invalid = |reason: &str| CustomersError::InvalidValue {
        field: spec.name.to_string(),
        reason: reason.to_string(),
    };
    match spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Select => Ok(FieldValue::Select(OptionId::new(raw))),
        FieldKind::Number => raw
            .parse::<Decimal>()
            .map(FieldValue::Number)
            .map_err(|_| invalid("expected a decimal amount")),
        FieldKind::Date => parse_date(raw)
            .map(FieldValue::Date)
            .ok_or_else(|| invalid("expected an ISO date (YYYY-MM-DD)")),
        FieldKind::Checkbox => raw
            .parse::<bool>()
            .map(FieldValue::Bool)
            .map_err(|_| invalid("expected true or false")),
        FieldKind::File => Err(invalid("use --file to upload or --clear to remove")),
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn owner_label(customer: &Customer) -> String {
    customer.assigned_employee.as_ref().map_or_else(
        || "unassigned".to_string(),
        |owner| {
            owner
                .full_name()
                .map_or_else(|| owner.id().to_string(), ToString::to_string)
        },
    )
}

fn format_badge(status: &CompositeStatus) -> String {
    let mut rendered = match status.badge {
        Badge::NoAction => "No Action".to_string(),
        Badge::Tracks(tones) => Track::ALL
            .iter()
            .map(|&track| format!("{}:{}", track.initial(), tones.get(track).as_str()))
            .collect::<Vec<_>>()
            .join(" "),
    };
    if status.pinned {
        rendered.push_str(" [pinned]");
    }
    if status.online {
        rendered.push_str(" [online]");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_per_kind() {
        let amount_spec = Track::Payment.field("payment_amount").expect("spec");
        assert!(matches!(
            parse_value(amount_spec, "2500.50"),
            Ok(FieldValue::Number(_))
        ));
        assert!(parse_value(amount_spec, "lots").is_err());

        let date_spec = Track::Payment.field("payment_date").expect("spec");
        assert!(matches!(
            parse_value(date_spec, "2024-06-10"),
            Ok(FieldValue::Date(_))
        ));
        assert!(parse_value(date_spec, "June 10th").is_err());

        let status_spec = Track::Payment.field("payment_status").expect("spec");
        assert_eq!(
            parse_value(status_spec, "2").expect("select"),
            FieldValue::Select(OptionId::new("2"))
        );

        let flag_spec = Track::Payment.field("profile_verified").expect("spec");
        assert_eq!(
            parse_value(flag_spec, "true").expect("bool"),
            FieldValue::Bool(true)
        );

        let file_spec = Track::Payment.field("payment_receipt").expect("spec");
        assert!(parse_value(file_spec, "receipt.png").is_err());
    }

    #[test]
    fn test_clear_wins_over_value() {
        let spec = Track::Payment.field("payment_receipt").expect("spec");
        let value = resolve_new_value(
            spec,
            NewValue {
                value: Some("ignored".to_string()),
                file: None,
                clear: true,
            },
        )
        .expect("clear");
        assert_eq!(value, FieldValue::Null);
    }

    #[test]
    fn test_content_type_guessing() {
        assert_eq!(guess_content_type(Path::new("r.PNG")), "image/png");
        assert_eq!(guess_content_type(Path::new("scan.pdf")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }
}
