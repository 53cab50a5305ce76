use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::pricing::{
    compute_budget, compute_remaining_balance, PricingDefaults, DISSERTATION_PRICING,
    NORMAL_PRICING,
};
use super::schedule::{self, BadgeVariant, Priority};
use crate::store::DocumentId;
use crate::workflows::errors::ValidationError;
use crate::workflows::input::{
    deserialize_lenient_number, deserialize_optional_date, deserialize_optional_lenient_number,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Normal,
    Dissertation,
}

impl OrderKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::Normal, Self::Dissertation]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Dissertation => "Dissertation",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" | "normal order" | "normal_order" => Some(Self::Normal),
            "dissertation" => Some(Self::Dissertation),
            _ => None,
        }
    }

    pub const fn default_pricing(self) -> PricingDefaults {
        match self {
            Self::Normal => NORMAL_PRICING,
            Self::Dissertation => DISSERTATION_PRICING,
        }
    }

    /// Only dissertations are paid in instalments.
    pub const fn tracks_payments(self) -> bool {
        matches!(self, Self::Dissertation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl OrderStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Pending, Self::InProgress, Self::Completed]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "pending" => Some(Self::Pending),
            "inprogress" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Accepts the wire names (`in_progress`) as well as the labels staff type (`In Progress`).
impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_label(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown order status `{raw}`, expected pending, in_progress or completed"
            ))
        })
    }
}

/// Inputs the budget is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    pub word_count: u32,
    pub cost_per_page: f64,
    pub has_code: bool,
    pub code_price: f64,
}

impl PricingInputs {
    pub fn budget(&self) -> f64 {
        compute_budget(
            self.word_count,
            self.cost_per_page,
            self.has_code,
            self.code_price,
        )
    }
}

/// Descriptive fields every order kind shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub project_name: String,
    pub order_date: NaiveDate,
    pub submission_date: NaiveDate,
    pub supervisor_name: String,
    pub season: String,
    pub status: OrderStatus,
    pub progress: u8,
}

/// Instalment tracking for dissertations. `is_fully_paid` is asserted by staff and is not
/// derived from `remaining_balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLedger {
    pub words_paid: u32,
    pub total_paid: f64,
    pub remaining_balance: f64,
    pub is_fully_paid: bool,
    pub date_paid: Option<NaiveDate>,
}

impl PaymentLedger {
    pub fn unpaid(budget: f64) -> Self {
        Self {
            words_paid: 0,
            total_paid: 0.0,
            remaining_balance: compute_remaining_balance(budget, 0.0),
            is_fully_paid: false,
            date_paid: None,
        }
    }

    pub fn rebalance(&mut self, budget: f64) {
        self.remaining_balance = compute_remaining_balance(budget, self.total_paid);
    }

    pub(crate) fn apply(&mut self, payment: &ValidatedPayment, budget: f64) {
        self.words_paid = payment.words_paid;
        self.total_paid = payment.total_paid;
        self.date_paid = payment.date_paid;
        self.is_fully_paid = payment.is_fully_paid;
        self.rebalance(budget);
    }
}

/// A stored order. `budget` and the ledger balance are recomputed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: DocumentId,
    pub kind: OrderKind,
    #[serde(flatten)]
    pub details: OrderDetails,
    #[serde(flatten)]
    pub pricing: PricingInputs,
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentLedger>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub(crate) fn new(
        id: DocumentId,
        kind: OrderKind,
        fields: OrderFields,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let budget = fields.pricing.budget();
        let payment = if kind.tracks_payments() {
            let mut ledger = PaymentLedger::unpaid(budget);
            if let Some(initial) = &fields.initial_payment {
                ledger.apply(initial, budget);
            }
            Some(ledger)
        } else {
            None
        };

        Self {
            id,
            kind,
            details: fields.details,
            pricing: fields.pricing,
            budget,
            payment,
            updated_at,
        }
    }

    /// Full overwrite of the descriptive and pricing fields; kind and id are kept.
    pub(crate) fn overwrite(&mut self, fields: OrderFields, updated_at: DateTime<Utc>) {
        self.details = fields.details;
        self.pricing = fields.pricing;
        self.budget = self.pricing.budget();
        self.updated_at = updated_at;

        if let Some(ledger) = self.payment.as_mut() {
            match &fields.initial_payment {
                Some(payment) => ledger.apply(payment, self.budget),
                None => ledger.rebalance(self.budget),
            }
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        schedule::is_overdue(self.details.status, self.details.submission_date, today)
    }

    pub fn priority(&self, today: NaiveDate) -> Priority {
        schedule::priority(self.details.status, self.details.submission_date, today)
    }

    pub fn badge(&self, today: NaiveDate) -> BadgeVariant {
        schedule::badge_variant(self.details.status, self.is_overdue(today))
    }

    pub fn remaining_balance(&self) -> Option<f64> {
        self.payment.as_ref().map(|ledger| ledger.remaining_balance)
    }

    pub fn total_paid(&self) -> Option<f64> {
        self.payment.as_ref().map(|ledger| ledger.total_paid)
    }
}

/// Order form as submitted by a caller. Derived fields (budget, balance) are not accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmission {
    #[serde(default)]
    pub project_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub submission_date: Option<NaiveDate>,
    #[serde(default)]
    pub supervisor_name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub word_count: f64,
    #[serde(default, deserialize_with = "deserialize_optional_lenient_number")]
    pub cost_per_page: Option<f64>,
    #[serde(default)]
    pub has_code: bool,
    #[serde(default, deserialize_with = "deserialize_optional_lenient_number")]
    pub code_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub progress: f64,
    /// Payment fields entered on the dissertation form alongside the order itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentUpdate>,
}

/// Validated form content ready to become (or overwrite) an [`Order`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFields {
    pub details: OrderDetails,
    pub pricing: PricingInputs,
    pub(crate) initial_payment: Option<ValidatedPayment>,
}

impl OrderSubmission {
    pub fn validate(self, kind: OrderKind) -> Result<OrderFields, ValidationError> {
        let project_name = ValidationError::required_text("project_name", &self.project_name)?;
        let order_date = self
            .order_date
            .ok_or(ValidationError::MissingField("order_date"))?;
        let submission_date = self
            .submission_date
            .ok_or(ValidationError::MissingField("submission_date"))?;
        let supervisor_name =
            ValidationError::required_text("supervisor_name", &self.supervisor_name)?;
        let season = ValidationError::required_text("season", &self.season)?;

        let defaults = kind.default_pricing();
        let word_count = ValidationError::non_negative("word_count", self.word_count)?;
        let cost_per_page = ValidationError::non_negative(
            "cost_per_page",
            self.cost_per_page.unwrap_or(defaults.cost_per_page),
        )?;
        let code_price = ValidationError::non_negative(
            "code_price",
            self.code_price.unwrap_or(defaults.code_price),
        )?;
        let progress = ValidationError::percentage("progress", self.progress)?;

        let initial_payment = match self.payment {
            Some(payment) if kind.tracks_payments() => Some(payment.validate()?),
            Some(payment) if payment.is_empty() => None,
            Some(_) => return Err(ValidationError::PaymentsNotTracked { kind }),
            None => None,
        };

        Ok(OrderFields {
            details: OrderDetails {
                project_name,
                order_date,
                submission_date,
                supervisor_name,
                season,
                status: self.status,
                progress,
            },
            pricing: PricingInputs {
                word_count: word_count.trunc().min(f64::from(u32::MAX)) as u32,
                cost_per_page,
                has_code: self.has_code,
                code_price,
            },
            initial_payment,
        })
    }
}

/// Payment form for a dissertation; replaces the ledger's paid amounts wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentUpdate {
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub words_paid: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub total_paid: f64,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_paid: Option<NaiveDate>,
    #[serde(default)]
    pub is_fully_paid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidatedPayment {
    pub(crate) words_paid: u32,
    pub(crate) total_paid: f64,
    pub(crate) date_paid: Option<NaiveDate>,
    pub(crate) is_fully_paid: bool,
}

impl PaymentUpdate {
    fn is_empty(&self) -> bool {
        self.words_paid == 0.0
            && self.total_paid == 0.0
            && self.date_paid.is_none()
            && !self.is_fully_paid
    }

    pub(crate) fn validate(&self) -> Result<ValidatedPayment, ValidationError> {
        let words_paid = ValidationError::non_negative("words_paid", self.words_paid)?;
        let total_paid = ValidationError::non_negative("total_paid", self.total_paid)?;

        Ok(ValidatedPayment {
            words_paid: words_paid.trunc().min(f64::from(u32::MAX)) as u32,
            total_paid,
            date_paid: self.date_paid,
            is_fully_paid: self.is_fully_paid,
        })
    }
}

/// One spreadsheet row converted to a submission, or the reason it could not be.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub line: usize,
    /// Kind named on the row itself; the import target's kind applies when absent.
    pub kind: Option<OrderKind>,
    pub submission: Result<OrderSubmission, ValidationError>,
}
