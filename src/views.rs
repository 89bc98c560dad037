//! Typed read access over response records.
//!
//! Views borrow a [`Record`] and expose the fields the provider documents,
//! returning `None` for anything missing or of an unexpected type. The record
//! itself stays the source of truth, so undocumented fields remain reachable
//! through [`RecordView::record`].

use crate::types::{EccangResult, Record};
use serde_json::Value;

/// A typed view borrowing a response record.
pub trait RecordView<'a>: Sized {
    fn from_record(record: &'a Record) -> Self;

    fn record(&self) -> &'a Record;

    /// String-valued field; `None` when absent or not a string.
    fn text(&self, field: &str) -> Option<&'a str> {
        self.record().get(field).and_then(Value::as_str)
    }
}

impl EccangResult {
    /// Views over every record of a successful response.
    pub fn views<'a, V: RecordView<'a>>(&'a self) -> Vec<V> {
        self.records().iter().map(V::from_record).collect()
    }

    /// View over the first record of a successful response.
    pub fn view<'a, V: RecordView<'a>>(&'a self) -> Option<V> {
        self.record().map(V::from_record)
    }
}

/// `createOrder` / `batchCreateOrder` result item.
#[derive(Debug, Clone, Copy)]
pub struct OrderView<'a>(&'a Record);

impl<'a> RecordView<'a> for OrderView<'a> {
    fn from_record(record: &'a Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &'a Record {
        self.0
    }
}

impl<'a> OrderView<'a> {
    pub fn reference_no(&self) -> Option<&'a str> {
        self.text("reference_no")
    }

    pub fn shipping_method_no(&self) -> Option<&'a str> {
        self.text("shipping_method_no")
    }

    pub fn order_code(&self) -> Option<&'a str> {
        self.text("order_code")
    }

    pub fn track_status(&self) -> Option<&'a str> {
        self.text("track_status")
    }

    pub fn agent_number(&self) -> Option<&'a str> {
        self.text("agent_number")
    }
}

/// `getTrackNumber` result item.
#[derive(Debug, Clone, Copy)]
pub struct TrackNumberView<'a>(&'a Record);

impl<'a> RecordView<'a> for TrackNumberView<'a> {
    fn from_record(record: &'a Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &'a Record {
        self.0
    }
}

impl<'a> TrackNumberView<'a> {
    pub fn order_number(&self) -> Option<&'a str> {
        self.text("OrderNumber")
    }

    pub fn tracking_number(&self) -> Option<&'a str> {
        self.text("TrackingNumber")
    }

    pub fn waybill_number(&self) -> Option<&'a str> {
        self.text("WayBillNumber")
    }

    /// Package identifier to tracking number pairs.
    ///
    /// After normalization every value is a comma-delimited string.
    pub fn tracking_numbers(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0
            .get(crate::normalize::TRACKING_NUMBER_LIST_FIELD)
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|numbers| numbers.iter())
            .filter_map(|(package, number)| Some((package.as_str(), number.as_str()?)))
    }
}

/// `getCargoTrack` result item.
#[derive(Debug, Clone, Copy)]
pub struct CargoTrackView<'a>(&'a Record);

impl<'a> RecordView<'a> for CargoTrackView<'a> {
    fn from_record(record: &'a Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &'a Record {
        self.0
    }
}

impl<'a> CargoTrackView<'a> {
    pub fn code(&self) -> Option<&'a str> {
        self.text("Code")
    }

    pub fn status(&self) -> Option<&'a str> {
        self.text("Status")
    }

    pub fn tracking_number(&self) -> Option<&'a str> {
        self.text("TrackingNumber")
    }

    pub fn latest_comment(&self) -> Option<&'a str> {
        self.text("New_Comment")
    }

    /// Tracking events; normalization guarantees `Detail` is a list.
    pub fn details(&self) -> impl Iterator<Item = &'a Record> {
        self.0
            .get(crate::normalize::DETAIL_FIELD)
            .and_then(Value::as_array)
            .into_iter()
            .flat_map(|events| events.iter())
            .filter_map(Value::as_object)
    }
}

/// `feeTrail` quote.
#[derive(Debug, Clone, Copy)]
pub struct FeeQuoteView<'a>(&'a Record);

impl<'a> RecordView<'a> for FeeQuoteView<'a> {
    fn from_record(record: &'a Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &'a Record {
        self.0
    }
}

impl<'a> FeeQuoteView<'a> {
    pub fn service_code(&self) -> Option<&'a str> {
        self.text("ServiceCode")
    }

    pub fn total_fee(&self) -> Option<&'a str> {
        self.text("TotalFee")
    }

    pub fn charge_weight(&self) -> Option<&'a str> {
        self.text("ChargeWeight")
    }

    pub fn effectiveness(&self) -> Option<&'a str> {
        self.text("Effectiveness")
    }
}

/// Label returned by `getLabelUrl`, `batchGetLabel` and `getLabelByTemplate`.
#[derive(Debug, Clone, Copy)]
pub struct LabelView<'a>(&'a Record);

impl<'a> RecordView<'a> for LabelView<'a> {
    fn from_record(record: &'a Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &'a Record {
        self.0
    }
}

impl<'a> LabelView<'a> {
    pub fn reference_no(&self) -> Option<&'a str> {
        self.text("reference_no")
    }

    pub fn url(&self) -> Option<&'a str> {
        self.text("url")
    }

    pub fn invoice_url(&self) -> Option<&'a str> {
        self.text("invoice_url")
    }

    /// Per-label status, reported separately from the call's own `ask`.
    pub fn is_success(&self) -> bool {
        self.text("ask") == Some("Success")
    }
}
