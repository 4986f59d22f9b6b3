//! The customer record as served by the bureau API.
//!
//! Wire tolerance notes: select ids arrive as numbers or strings, dates may
//! carry a time component, amounts may be numbers or strings, and the
//! assigned employee is either a bare id or a denormalized embed. All of
//! that is absorbed at deserialization so the rest of the system works with
//! typed values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{CustomerId, EmployeeId, FieldValue, OptionId, parse_date};
use crate::track::Track;

/// The employee owning a customer: a bare id or an embedded projection.
///
/// Reassignment replaces this whole value; ownership is never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeRef {
    Embedded {
        user_id: EmployeeId,
        #[serde(default)]
        full_name: Option<String>,
    },
    Id(EmployeeId),
}

impl EmployeeRef {
    #[must_use]
    pub const fn id(&self) -> &EmployeeId {
        match self {
            Self::Embedded { user_id, .. } | Self::Id(user_id) => user_id,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        match self {
            Self::Embedded { full_name, .. } => full_name.as_deref(),
            Self::Id(_) => None,
        }
    }
}

/// One entry of the employee directory, used by the assignment picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub user_id: EmployeeId,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A customer record with its three workflow tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Customer {
    pub user_id: CustomerId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub assigned_employee: Option<EmployeeRef>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub online: bool,

    // Payment track
    #[serde(default, deserialize_with = "de_opt_select")]
    pub package_name: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub package_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub profile_highlighter: bool,
    #[serde(default)]
    pub account_status: bool,
    #[serde(default)]
    pub profile_verified: bool,
    #[serde(default, deserialize_with = "de_opt_select")]
    pub payment_status: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_select")]
    pub payment_method: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub payment_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub payment_receipt: Option<String>,
    #[serde(default, deserialize_with = "de_opt_select")]
    pub payment_admin_approval: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub bank_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub account_holder_name: Option<String>,

    // Agreement track
    #[serde(default, deserialize_with = "de_opt_select")]
    pub agreement_status: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub agreement_file: Option<String>,
    #[serde(default, deserialize_with = "de_opt_select")]
    pub admin_agreement_approval: Option<OptionId>,

    // Settlement track
    #[serde(default, deserialize_with = "de_opt_select")]
    pub settlement_status: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub settlement_by: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub settlement_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_select")]
    pub settlement_type: Option<OptionId>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub settlement_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub settlement_receipt: Option<String>,
    #[serde(default, deserialize_with = "de_opt_select")]
    pub settlement_admin_approval: Option<OptionId>,
}

impl Customer {
    /// A blank record with all three tracks untouched, as produced by the
    /// onboarding form.
    #[must_use]
    pub fn empty(user_id: impl Into<CustomerId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// The stable external key addressing this record in partial updates.
    #[must_use]
    pub const fn id(&self) -> &CustomerId {
        &self.user_id
    }

    /// Project one field into the uniform value type.
    ///
    /// Unknown names yield `Null`; the track table is the authority on
    /// which names exist.
    #[must_use]
    pub fn field(&self, name: &str) -> FieldValue {
        fn select(id: Option<&OptionId>) -> FieldValue {
            id.map_or(FieldValue::Null, |id| FieldValue::Select(id.clone()))
        }
        fn text(s: Option<&String>) -> FieldValue {
            s.map_or(FieldValue::Null, |s| FieldValue::Text(s.clone()))
        }
        fn file(url: Option<&String>) -> FieldValue {
            url.map_or(FieldValue::Null, |u| FieldValue::FileRef(u.clone()))
        }
        fn date(d: Option<NaiveDate>) -> FieldValue {
            d.map_or(FieldValue::Null, FieldValue::Date)
        }
        fn amount(a: Option<Decimal>) -> FieldValue {
            a.map_or(FieldValue::Null, FieldValue::Number)
        }

        match name {
            "package_name" => select(self.package_name.as_ref()),
            "package_expiry" => date(self.package_expiry),
            "profile_highlighter" => FieldValue::Bool(self.profile_highlighter),
            "account_status" => FieldValue::Bool(self.account_status),
            "profile_verified" => FieldValue::Bool(self.profile_verified),
            "payment_status" => select(self.payment_status.as_ref()),
            "payment_method" => select(self.payment_method.as_ref()),
            "payment_amount" => amount(self.payment_amount),
            "payment_date" => date(self.payment_date),
            "payment_receipt" => file(self.payment_receipt.as_ref()),
            "payment_admin_approval" => select(self.payment_admin_approval.as_ref()),
            "bank_name" => text(self.bank_name.as_ref()),
            "account_holder_name" => text(self.account_holder_name.as_ref()),
            "agreement_status" => select(self.agreement_status.as_ref()),
            "agreement_file" => file(self.agreement_file.as_ref()),
            "admin_agreement_approval" => select(self.admin_agreement_approval.as_ref()),
            "settlement_status" => select(self.settlement_status.as_ref()),
            "settlement_by" => text(self.settlement_by.as_ref()),
            "settlement_amount" => amount(self.settlement_amount),
            "settlement_type" => select(self.settlement_type.as_ref()),
            "settlement_date" => date(self.settlement_date),
            "settlement_receipt" => file(self.settlement_receipt.as_ref()),
            "settlement_admin_approval" => select(self.settlement_admin_approval.as_ref()),
            _ => FieldValue::Null,
        }
    }

    /// The stage value of a track.
    #[must_use]
    pub const fn status(&self, track: Track) -> Option<&OptionId> {
        match track {
            Track::Payment => self.payment_status.as_ref(),
            Track::Agreement => self.agreement_status.as_ref(),
            Track::Settlement => self.settlement_status.as_ref(),
        }
    }

    /// The admin-approval gate of a track.
    #[must_use]
    pub const fn approval(&self, track: Track) -> Option<&OptionId> {
        match track {
            Track::Payment => self.payment_admin_approval.as_ref(),
            Track::Agreement => self.admin_agreement_approval.as_ref(),
            Track::Settlement => self.settlement_admin_approval.as_ref(),
        }
    }
}

fn de_opt_select<'de, D: Deserializer<'de>>(de: D) -> Result<Option<OptionId>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(OptionId::from_value(&value))
}

fn de_opt_date<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(value.as_str().and_then(parse_date))
}

fn de_opt_amount<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Decimal>, D::Error> {
    let value = Value::deserialize(de)?;
    let parsed = match &value {
        Value::String(s) if !s.is_empty() => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    };
    Ok(parsed)
}

fn de_opt_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}
