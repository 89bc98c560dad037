//! ECCANG client façade.
//!
//! Every operation runs the same pipeline: build the envelope, post it, pull
//! the JSON out of the reply, reconcile per-operation shape quirks, then hand
//! a redacted audit record to the logger before returning or re-raising.

use crate::audit::{AuditLogger, AuditRecord, TracingAuditLogger};
use crate::config::{Credentials, EccangConfig};
use crate::envelope::{build_envelope_raw, extract_response, payload_text};
use crate::error::ClientError;
use crate::normalize::Normalization;
use crate::redact::redact_sensitive;
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    AddressValidateRequest, BatchCreateOrderRequest, BatchLabelRequest, BatchPodRequest,
    CargoTrackRequest, CreateOrderRequest, EccangResult, EditOrderSizeRequest, FeeTrailRequest,
    FieldRuleRequest, InterceptOrderRequest, LabelByTemplateRequest, LabelUrlRequest,
    ModifyOrderWeightRequest, PickupRequest, Record, ReferenceRequest, TrackNumberRequest,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Client for the ECCANG web service.
///
/// Holds only immutable collaborators, so it can be shared across tasks
/// (it is cheap to clone).
#[derive(Clone)]
pub struct EccangClient {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    logger: Option<Arc<dyn AuditLogger>>,
}

impl std::fmt::Debug for EccangClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EccangClient")
            .field("credentials", &self.credentials)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl EccangClient {
    /// Create a client over an explicit transport, without audit logging.
    pub fn new(credentials: Credentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
            logger: None,
        }
    }

    /// Create a client posting over HTTP as described by `config`.
    ///
    /// With `audit.enabled` the client logs through [`TracingAuditLogger`].
    pub fn from_config(config: &EccangConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(&config.endpoint)?;
        let client = Self::new(config.credentials.clone(), Arc::new(transport));
        Ok(if config.audit.enabled {
            client.with_logger(Arc::new(TracingAuditLogger))
        } else {
            client
        })
    }

    /// Attach an audit logger.
    pub fn with_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Invoke any service, returning the decoded document untyped.
    pub async fn call<P: Serialize + ?Sized>(
        &self,
        service: &str,
        params: &P,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call(service, params, Normalization::None).await
    }

    async fn soap_call<P: Serialize + ?Sized>(
        &self,
        service: &str,
        params: &P,
        normalization: Normalization,
    ) -> Result<EccangResult, ClientError> {
        let timestamp = Utc::now();

        let request = match serde_json::to_value(params) {
            Ok(request) => request,
            Err(e) => {
                let err = ClientError::from(e);
                self.log_failure(service, Value::Null, &err, 0, timestamp).await;
                return Err(err);
            }
        };
        let envelope = build_envelope_raw(&self.credentials, service, &payload_text(&request));

        debug!(service = %service, "Dispatching ECCANG call");
        let start = Instant::now();

        let outcome = match self.transport.post(envelope).await {
            Ok(body) => decode(&body, normalization),
            Err(err) => Err(err),
        };
        let duration_ms = elapsed_ms(start);

        match outcome {
            Ok((document, result)) => {
                debug!(
                    service = %service,
                    ask = ?result.ask,
                    duration_ms = duration_ms,
                    "ECCANG call completed"
                );
                if let Some(logger) = &self.logger {
                    let record = AuditRecord::success(
                        service,
                        redact_sensitive(&request),
                        redact_sensitive(&document),
                        duration_ms,
                        timestamp,
                    );
                    logger.log(record).await;
                }
                Ok(result)
            }
            Err(err) => {
                self.log_failure(service, request, &err, duration_ms, timestamp).await;
                Err(err)
            }
        }
    }

    async fn log_failure(
        &self,
        service: &str,
        request: Value,
        err: &ClientError,
        duration_ms: u64,
        timestamp: chrono::DateTime<Utc>,
    ) {
        warn!(
            service = %service,
            code = %err.code(),
            duration_ms = duration_ms,
            error = %err,
            "ECCANG call failed"
        );
        if let Some(logger) = &self.logger {
            let record = AuditRecord::failure(service, redact_sensitive(&request), err, duration_ms, timestamp);
            logger.log(record).await;
        }
    }

    // ------------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------------

    pub async fn create_order(
        &self,
        params: &CreateOrderRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("createOrder", params, Normalization::None).await
    }

    pub async fn batch_create_order(
        &self,
        params: &BatchCreateOrderRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("batchCreateOrder", params, Normalization::None).await
    }

    pub async fn check_reference_no(
        &self,
        params: &ReferenceRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("checkReferenceNo", params, Normalization::None).await
    }

    pub async fn edit_order_size(
        &self,
        params: &EditOrderSizeRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("editOrderSize", params, Normalization::None).await
    }

    pub async fn modify_order_weight(
        &self,
        params: &ModifyOrderWeightRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("modifyOrderWeight", params, Normalization::None).await
    }

    pub async fn intercept_order(
        &self,
        params: &InterceptOrderRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("interceptOrder", params, Normalization::None).await
    }

    pub async fn cancel_intercept_order_by_tms(
        &self,
        params: &ReferenceRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("cancelInterceptOrderByTms", params, Normalization::None).await
    }

    pub async fn cancel_order(
        &self,
        params: &ReferenceRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("cancelOrder", params, Normalization::None).await
    }

    pub async fn update_tracking_number_and_label(
        &self,
        params: &Record,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("updateTrackingNumberAndLabel", params, Normalization::None).await
    }

    // ------------------------------------------------------------------------
    // Tracking
    // ------------------------------------------------------------------------

    /// Tracking numbers per order; multi-package numbers are comma-joined.
    pub async fn get_track_number(
        &self,
        params: &TrackNumberRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getTrackNumber", params, Normalization::FlattenTrackingNumbers)
            .await
    }

    /// Tracking events per waybill; `Detail` is always a list.
    pub async fn get_cargo_track(
        &self,
        params: &CargoTrackRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getCargoTrack", params, Normalization::CoerceDetailArray).await
    }

    pub async fn batch_get_pod(&self, params: &BatchPodRequest) -> Result<EccangResult, ClientError> {
        self.soap_call("batchGetPod", params, Normalization::None).await
    }

    pub async fn get_sender_message(
        &self,
        params: &ReferenceRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getSenderMessage", params, Normalization::None).await
    }

    // ------------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------------

    pub async fn get_label_url(&self, params: &LabelUrlRequest) -> Result<EccangResult, ClientError> {
        self.soap_call("getLabelUrl", params, Normalization::None).await
    }

    pub async fn batch_get_label(
        &self,
        params: &BatchLabelRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("batchGetLabel", params, Normalization::None).await
    }

    pub async fn get_print_template_name(
        &self,
        params: &Record,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getPrintTemplateName", params, Normalization::None).await
    }

    pub async fn get_label_by_template(
        &self,
        params: &LabelByTemplateRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getLabelByTemplate", params, Normalization::None).await
    }

    // ------------------------------------------------------------------------
    // Pricing
    // ------------------------------------------------------------------------

    pub async fn fee_trail(&self, params: &FeeTrailRequest) -> Result<EccangResult, ClientError> {
        self.soap_call("feeTrail", params, Normalization::None).await
    }

    pub async fn get_receiving_expense(
        &self,
        params: &ReferenceRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getReceivingExpense", params, Normalization::None).await
    }

    // ------------------------------------------------------------------------
    // Reference data
    // ------------------------------------------------------------------------

    pub async fn get_shipping_method(&self, params: &Record) -> Result<EccangResult, ClientError> {
        self.soap_call("getShippingMethod", params, Normalization::None).await
    }

    pub async fn get_shipping_method_info(
        &self,
        params: &Record,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("getShippingMethodInfo", params, Normalization::None).await
    }

    pub async fn get_country(&self) -> Result<EccangResult, ClientError> {
        self.soap_call("getCountry", &json!({}), Normalization::None).await
    }

    pub async fn get_goodstype(&self) -> Result<EccangResult, ClientError> {
        self.soap_call("getGoodstype", &json!({}), Normalization::None).await
    }

    pub async fn get_field_rule(&self, params: &FieldRuleRequest) -> Result<EccangResult, ClientError> {
        self.soap_call("getFieldRule", params, Normalization::None).await
    }

    pub async fn get_basic_data(&self, params: &Record) -> Result<EccangResult, ClientError> {
        self.soap_call("getBasicData", params, Normalization::None).await
    }

    pub async fn address_validate(
        &self,
        params: &AddressValidateRequest,
    ) -> Result<EccangResult, ClientError> {
        self.soap_call("addressValidate", params, Normalization::None).await
    }

    // ------------------------------------------------------------------------
    // Account and pickups
    // ------------------------------------------------------------------------

    pub async fn register(&self, params: &Record) -> Result<EccangResult, ClientError> {
        self.soap_call("register", params, Normalization::None).await
    }

    pub async fn create_ups_pickup(&self, params: &PickupRequest) -> Result<EccangResult, ClientError> {
        self.soap_call("createUpsPickup", params, Normalization::None).await
    }

    pub async fn create_mydhl_pickup(&self, params: &PickupRequest) -> Result<EccangResult, ClientError> {
        self.soap_call("createMydhlPickup", params, Normalization::None).await
    }
}

/// Extract, normalize and decode a response body.
///
/// Only envelope and JSON syntax errors fail; the document's shape is
/// trusted. The normalized document is returned alongside the result so the
/// audit record shows what the provider answered.
fn decode(body: &str, normalization: Normalization) -> Result<(Value, EccangResult), ClientError> {
    let document = normalization.apply(extract_response(body)?);
    let result = EccangResult::from_document(document.clone());
    Ok((document, result))
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
