use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::pricing::PaymentSplit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "rejected" => Ok(BookingStatus::Rejected),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    AdvancePaid,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::AdvancePaid => "advance_paid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "advance_paid" => Ok(PaymentStatus::AdvancePaid),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    None,
    Full,
    Partial,
    Processed,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::None => "none",
            RefundStatus::Full => "full",
            RefundStatus::Partial => "partial",
            RefundStatus::Processed => "processed",
        }
    }
}

impl FromStr for RefundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RefundStatus::None),
            "full" => Ok(RefundStatus::Full),
            "partial" => Ok(RefundStatus::Partial),
            "processed" => Ok(RefundStatus::Processed),
            _ => Err(format!("Invalid refund status: {}", s)),
        }
    }
}

/// Ceremony booking with its payment split and refund bookkeeping.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "id")]
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub pandit_id: Option<Uuid>,
    pub ceremony_type: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub address: String,
    pub notes: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub total_amount: Decimal,
    pub advance_amount: Decimal,
    pub remaining_amount: Decimal,
    pub advance_paid: bool,
    pub remaining_paid: bool,
    pub razorpay_order_id: Option<String>,
    /// Portion the open order pays, `advance` or `remaining`.
    pub razorpay_order_type: Option<String>,
    pub advance_payment_id: Option<String>,
    pub remaining_payment_id: Option<String>,
    pub refund_amount: Decimal,
    pub refund_status: String,
    pub refund_id: Option<String>,
    pub cancelled_utc: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        pandit_id: Option<Uuid>,
        ceremony_type: String,
        booking_date: NaiveDate,
        booking_time: NaiveTime,
        address: String,
        notes: Option<String>,
        split: PaymentSplit,
    ) -> Self {
        let now = Utc::now();
        Self {
            booking_id: Uuid::new_v4(),
            user_id,
            pandit_id,
            ceremony_type,
            booking_date,
            booking_time,
            address,
            notes,
            status: BookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            total_amount: split.total_amount,
            advance_amount: split.advance_amount,
            remaining_amount: split.remaining_amount,
            advance_paid: false,
            remaining_paid: false,
            razorpay_order_id: None,
            razorpay_order_type: None,
            advance_payment_id: None,
            remaining_payment_id: None,
            refund_amount: Decimal::ZERO,
            refund_status: RefundStatus::None.as_str().to_string(),
            refund_id: None,
            cancelled_utc: None,
            cancellation_reason: None,
            created_utc: now,
            updated_utc: now,
        }
    }

    /// Status column as an enum. The table's CHECK constraint keeps it parseable.
    pub fn status(&self) -> BookingStatus {
        self.status.parse().unwrap_or(BookingStatus::Pending)
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status.parse().unwrap_or(PaymentStatus::Pending)
    }

    pub fn refund_status(&self) -> RefundStatus {
        self.refund_status.parse().unwrap_or(RefundStatus::None)
    }

    /// Scheduled start, with the stored date and time read as UTC.
    pub fn ceremony_at(&self) -> DateTime<Utc> {
        self.booking_date.and_time(self.booking_time).and_utc()
    }
}

/// Booking joined with the names and contacts of both parties.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub pandit_name: Option<String>,
    pub pandit_phone: Option<String>,
}
