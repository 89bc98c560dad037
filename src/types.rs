//! Wire types: the decoded result envelope and typed request parameters.
//!
//! Provider objects are only partially typed and vary per operation, so
//! responses stay as ordered [`Record`]s; see [`crate::views`] for typed
//! read access. Request structs carry an `extra` map for fields not modelled
//! here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Dynamically-keyed provider object, in wire order.
pub type Record = Map<String, Value>;

/// Status flag of a decoded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AskStatus {
    Success,
    Failure,
    /// Missing or unrecognised status
    #[default]
    #[serde(other)]
    Unknown,
}

/// Provider error descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "errCode", default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(rename = "errMessage", default, deserialize_with = "lenient_string")]
    pub message: String,
}

/// The `Error` member: one descriptor, a list, or an empty list.
///
/// Unknown shapes are kept as raw JSON rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorField {
    One(ApiError),
    Many(Vec<ApiError>),
    Other(Value),
}

impl From<Value> for ErrorField {
    fn from(raw: Value) -> Self {
        let parsed = match &raw {
            Value::Object(_) => serde_json::from_value(raw.clone()).map(Self::One),
            Value::Array(_) => serde_json::from_value(raw.clone()).map(Self::Many),
            _ => return Self::Other(raw),
        };
        parsed.unwrap_or(Self::Other(raw))
    }
}

impl<'de> Deserialize<'de> for ErrorField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl ErrorField {
    /// Descriptors carried by this member; empty for `[]` and unknown shapes.
    pub fn errors(&self) -> Vec<&ApiError> {
        match self {
            Self::One(err) => vec![err],
            Self::Many(errs) => errs.iter().collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

/// The `data` member as the provider sent it.
///
/// Operations documented to return a list sometimes answer with a single
/// object and vice versa, so cardinality is not fixed per operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    One(Record),
    Many(Vec<Record>),
    /// Scalars and lists that are not all objects, kept verbatim
    Other(Value),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(record) => Self::One(record),
            Value::Array(items) if items.iter().all(Value::is_object) => Self::Many(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(record) => Some(record),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl Payload {
    /// Records regardless of cardinality; empty for [`Payload::Other`].
    pub fn records(&self) -> &[Record] {
        match self {
            Self::One(record) => std::slice::from_ref(record),
            Self::Many(records) => records,
            Self::Other(_) => &[],
        }
    }

    /// First record, for operations documented to return one.
    pub fn record(&self) -> Option<&Record> {
        self.records().first()
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::One(record) => Value::Object(record),
            Self::Many(records) => Value::Array(records.into_iter().map(Value::Object).collect()),
            Self::Other(value) => value,
        }
    }
}

/// Decoded ECCANG response.
///
/// Any JSON document decodes; the provider's shape is trusted. `ask` is
/// authoritative: `data` is only kept on `Success`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EccangResult {
    pub ask: AskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Payload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<String>,

    /// Any other top-level members
    #[serde(flatten)]
    pub extra: Record,
}

impl<'de> Deserialize<'de> for EccangResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_document)
    }
}

impl EccangResult {
    /// Decode a parsed response document.
    ///
    /// Never fails: a document that is not an object decodes with an
    /// `Unknown` status, and members of unexpected types are read leniently.
    pub fn from_document(document: Value) -> Self {
        let Value::Object(fields) = document else {
            return Self::default();
        };

        let mut result = Self::default();
        let mut data = None;
        for (key, value) in fields {
            match key.as_str() {
                "ask" => result.ask = serde_json::from_value(value).unwrap_or_default(),
                "message" => result.message = lenient_opt_text(value),
                "Error" if !value.is_null() => result.error = Some(ErrorField::from(value)),
                "Error" => {}
                "data" if !value.is_null() => data = Some(Payload::from(value)),
                "data" => {}
                "time_cost" => result.time_cost = lenient_opt_text(value),
                _ => {
                    result.extra.insert(key, value);
                }
            }
        }
        if result.is_success() {
            result.data = data;
        }
        result
    }

    pub fn is_success(&self) -> bool {
        self.ask == AskStatus::Success
    }

    /// Payload of a successful call; always `None` otherwise.
    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref().filter(|_| self.is_success())
    }

    /// Records of a successful call, whether sent as one object or a list.
    pub fn records(&self) -> &[Record] {
        self.data().map(Payload::records).unwrap_or_default()
    }

    /// First record of a successful call.
    pub fn record(&self) -> Option<&Record> {
        self.records().first()
    }

    /// Error descriptors; empty when `Error` is absent or `[]`.
    pub fn errors(&self) -> Vec<&ApiError> {
        self.error.as_ref().map(ErrorField::errors).unwrap_or_default()
    }

    /// Best human-readable failure description.
    pub fn error_message(&self) -> Option<&str> {
        self.errors()
            .into_iter()
            .map(|e| e.message.as_str())
            .find(|m| !m.is_empty())
            .or(self.message.as_deref())
    }
}

fn lenient_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_opt_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(lenient_text(other)),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(lenient_text)
}

// ----------------------------------------------------------------------------
// Request parameters
// ----------------------------------------------------------------------------

/// Parcel recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Consignee {
    pub consignee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignee_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// Parcel sender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shipper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countrycode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// Customs line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub invoice_enname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_cnname: Option<String>,
    pub invoice_weight: f64,
    pub invoice_quantity: u32,
    pub invoice_unitcharge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<String>,
    /// `"Y"` or `"N"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_magnetoelectric: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// Box dimensions of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderVolume {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub box_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_number: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `createOrder` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub reference_no: String,
    pub shipping_method: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_pieces: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignee: Option<Consignee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper: Option<Shipper>,
    #[serde(rename = "ItemArr", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(rename = "Volume", default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<OrderVolume>>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `batchCreateOrder` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCreateOrderRequest {
    pub order_list: Vec<CreateOrderRequest>,
}

/// Parameters naming a single order by customer reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRequest {
    pub reference_no: String,
}

impl ReferenceRequest {
    pub fn new(reference_no: impl Into<String>) -> Self {
        Self {
            reference_no: reference_no.into(),
        }
    }
}

/// `getTrackNumber` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackNumberRequest {
    pub reference_no: Vec<String>,
}

/// `getLabelUrl` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelUrlRequest {
    pub reference_no: String,
    /// 1 = PNG, 2 = PDF, 3 = HTML
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_content_type: Option<u8>,
}

/// `getCargoTrack` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoTrackRequest {
    pub codes: Vec<String>,
    /// `Some(None)` sends an explicit `null`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Option<String>>,
    /// `"EN"` or `"CN"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// `feeTrail` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeTrailRequest {
    pub country_code: String,
    pub weight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub shipping_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `addressValidate` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressValidateRequest {
    pub shipping_method: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignee: Option<Consignee>,
    #[serde(rename = "ItemArr", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `batchGetLabel` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLabelRequest {
    pub reference_nos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<u8>,
}

/// `batchGetPod` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPodRequest {
    pub reference_nos: Vec<String>,
}

/// `editOrderSize` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOrderSizeRequest {
    pub reference_no: String,
    #[serde(rename = "Volume")]
    pub volumes: Vec<OrderVolume>,
}

/// `modifyOrderWeight` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifyOrderWeightRequest {
    pub reference_no: String,
    pub order_weight: f64,
}

/// `interceptOrder` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptOrderRequest {
    pub reference_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `getFieldRule` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRuleRequest {
    pub shipping_method: String,
    pub country_code: String,
    #[serde(flatten)]
    pub extra: Record,
}

/// `getLabelByTemplate` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelByTemplateRequest {
    pub template_code: String,
    pub codes: Vec<String>,
    #[serde(flatten)]
    pub extra: Record,
}

/// `createUpsPickup` / `createMydhlPickup` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickupRequest {
    pub reference_no: String,
    #[serde(flatten)]
    pub extra: Record,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> EccangResult {
        EccangResult::from_document(value)
    }

    #[test]
    fn test_decode_success() {
        let result = decode(json!({
            "ask": "Success",
            "message": "Created",
            "data": [{"order_code": "OC1"}],
            "time_cost": "0.12",
            "nonce": 7
        }));
        assert!(result.is_success());
        assert_eq!(result.message.as_deref(), Some("Created"));
        assert_eq!(result.time_cost.as_deref(), Some("0.12"));
        assert_eq!(result.extra["nonce"], json!(7));
        assert_eq!(result.records()[0]["order_code"], json!("OC1"));
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_error_single_and_many() {
        let one = decode(json!({"ask": "Failure", "Error": {"errCode": 10001, "errMessage": "bad"}}));
        assert_eq!(one.errors().len(), 1);
        assert_eq!(one.errors()[0].code, "10001");
        assert_eq!(one.error_message(), Some("bad"));

        let many = decode(json!({"ask": "Failure", "Error": [
            {"errCode": "A", "errMessage": "first"},
            {"errCode": "B", "errMessage": "second"}
        ]}));
        assert_eq!(many.errors().len(), 2);
    }

    #[test]
    fn test_absent_and_empty_error_mean_no_error() {
        let absent = decode(json!({"ask": "Success"}));
        let empty = decode(json!({"ask": "Success", "Error": []}));
        assert!(absent.errors().is_empty());
        assert!(empty.errors().is_empty());
        assert_eq!(empty.error, Some(ErrorField::Many(vec![])));
    }

    #[test]
    fn test_unknown_error_shape_kept() {
        let result = decode(json!({"ask": "Failure", "Error": "timeout", "message": "oops"}));
        assert_eq!(result.error, Some(ErrorField::Other(json!("timeout"))));
        assert_eq!(result.error_message(), Some("oops"));
    }

    #[test]
    fn test_unknown_ask() {
        assert_eq!(decode(json!({"ask": "Maybe"})).ask, AskStatus::Unknown);
        assert_eq!(decode(json!({"ask": 1})).ask, AskStatus::Unknown);
        assert_eq!(decode(json!({})).ask, AskStatus::Unknown);
    }

    #[test]
    fn test_failure_payload_not_kept() {
        let result = decode(json!({"ask": "Failure", "message": "Fail", "data": {"x": 1}}));
        assert!(result.data().is_none());
        assert!(result.records().is_empty());

        let printed = serde_json::to_value(&result).unwrap();
        assert_eq!(printed, json!({"ask": "Failure", "message": "Fail"}));
    }

    #[test]
    fn test_data_cardinality_is_trusted() {
        let single = decode(json!({"ask": "Success", "data": {"order_code": "OC1"}}));
        assert!(matches!(single.data(), Some(Payload::One(_))));
        assert_eq!(single.records().len(), 1);
        assert_eq!(single.record().unwrap()["order_code"], json!("OC1"));

        let list = decode(json!({"ask": "Success", "data": [{"url": "u"}]}));
        assert!(matches!(list.data(), Some(Payload::Many(_))));
        assert_eq!(list.record().unwrap()["url"], json!("u"));

        let empty = decode(json!({"ask": "Success", "data": []}));
        assert_eq!(empty.data(), Some(&Payload::Many(vec![])));
        assert!(empty.record().is_none());
    }

    #[test]
    fn test_non_record_data_kept_verbatim() {
        let scalar = decode(json!({"ask": "Success", "data": 5}));
        assert_eq!(scalar.data(), Some(&Payload::Other(json!(5))));
        assert!(scalar.records().is_empty());

        let mixed = decode(json!({"ask": "Success", "data": [{"a": 1}, "b"]}));
        assert_eq!(mixed.data().cloned().map(Payload::into_value), Some(json!([{"a": 1}, "b"])));
    }

    #[test]
    fn test_lenient_scalar_members() {
        let result = decode(json!({"ask": "Success", "message": 200, "time_cost": 0.5, "data": null}));
        assert_eq!(result.message.as_deref(), Some("200"));
        assert_eq!(result.time_cost.as_deref(), Some("0.5"));
        assert!(result.data().is_none());
    }

    #[test]
    fn test_non_object_document_decodes() {
        let result = decode(json!([{"ask": "Success"}]));
        assert_eq!(result.ask, AskStatus::Unknown);
        assert!(result.data().is_none());
        assert!(result.extra.is_empty());
    }

    #[test]
    fn test_deserialize_matches_from_document() {
        let parsed: EccangResult =
            serde_json::from_str(r#"{"ask":"Success","data":{"a":1},"Error":[]}"#).unwrap();
        assert_eq!(
            parsed,
            decode(json!({"ask": "Success", "data": {"a": 1}, "Error": []}))
        );
    }

    #[test]
    fn test_create_order_serialization_order() {
        let request = CreateOrderRequest {
            reference_no: "REF123".to_string(),
            shipping_method: "SM".to_string(),
            country_code: "US".to_string(),
            consignee: Some(Consignee {
                consignee_name: "John Doe".to_string(),
                email: Some("john@example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"reference_no":"REF123","shipping_method":"SM","country_code":"US","consignee":{"consignee_name":"John Doe","email":"john@example.com"}}"#
        );
    }

    #[test]
    fn test_cargo_track_explicit_null_type() {
        let request = CargoTrackRequest {
            codes: vec!["C1".to_string()],
            kind: Some(None),
            lang: Some("EN".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"codes":["C1"],"type":null,"lang":"EN"}"#
        );

        let omitted = CargoTrackRequest {
            codes: vec!["C1".to_string()],
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&omitted).unwrap(), r#"{"codes":["C1"]}"#);
    }
}
