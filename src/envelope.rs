//! SOAP envelope codec.
//!
//! The provider tunnels JSON through a single `callService` SOAP operation:
//! request parameters travel in a CDATA section, the reply sits inside a
//! `<response>` element, optionally CDATA-wrapped or entity-encoded.

use crate::config::Credentials;
use crate::error::ClientError;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

const ENVELOPE_HEADER: &str = "<SOAP-ENV:Envelope xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\" xmlns:ns1=\"http://www.example.org/Ec/\">\n  <SOAP-ENV:Body>\n    <ns1:callService>";
const ENVELOPE_FOOTER: &str = "    </ns1:callService>\n  </SOAP-ENV:Body>\n</SOAP-ENV:Envelope>";

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

static RESPONSE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<response>(.*?)</response>").expect("response pattern is valid")
});

/// Serialize request parameters into the JSON text carried by the envelope.
///
/// A value that serializes to a JSON string is taken as already-serialized
/// JSON and used verbatim; `null` becomes `{}`.
pub fn params_json<P: Serialize + ?Sized>(params: &P) -> Result<String, ClientError> {
    let value = serde_json::to_value(params)?;
    Ok(payload_text(&value))
}

pub(crate) fn payload_text(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.clone(),
        Value::Null => "{}".to_string(),
        other => other.to_string(),
    }
}

/// Build the outbound envelope for `service`.
///
/// Nothing is escaped: the JSON sits in CDATA and credentials and service
/// names are fixed provider identifiers.
pub fn build_envelope<P: Serialize + ?Sized>(
    credentials: &Credentials,
    service: &str,
    params: &P,
) -> Result<String, ClientError> {
    let payload = params_json(params)?;
    Ok(build_envelope_raw(credentials, service, &payload))
}

pub(crate) fn build_envelope_raw(credentials: &Credentials, service: &str, payload: &str) -> String {
    [
        ENVELOPE_HEADER.to_string(),
        format!("      <paramsJson>{CDATA_OPEN}{payload}{CDATA_CLOSE}</paramsJson>"),
        format!("      <appToken>{}</appToken>", credentials.app_token),
        format!("      <appKey>{}</appKey>", credentials.app_key),
        format!("      <service>{service}</service>"),
        ENVELOPE_FOOTER.to_string(),
    ]
    .join("\n")
}

/// Decode the five predefined XML entities.
///
/// `&amp;` goes last so that `&amp;lt;` decodes to the literal text `&lt;`.
pub fn decode_xml_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Extract the JSON text embedded in a response envelope.
pub fn extract_payload(xml: &str) -> Result<String, ClientError> {
    let captures = RESPONSE_ELEMENT
        .captures(xml)
        .ok_or_else(|| ClientError::Protocol("missing response element".to_string()))?;

    let mut payload = captures.get(1).map_or("", |m| m.as_str()).trim();

    if payload.starts_with(CDATA_OPEN) {
        let end = payload.len().saturating_sub(CDATA_CLOSE.len()).max(CDATA_OPEN.len());
        payload = payload.get(CDATA_OPEN.len()..end).unwrap_or("");
    }

    let decoded = decode_xml_entities(payload.trim());
    if decoded.is_empty() {
        return Err(ClientError::EmptyResponse);
    }
    Ok(decoded)
}

/// Extract and parse the JSON document embedded in a response envelope.
pub fn extract_response(xml: &str) -> Result<Value, ClientError> {
    let payload = extract_payload(xml)?;
    serde_json::from_str(&payload).map_err(|e| ClientError::ResponseParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials::new("token", "key")
    }

    fn wrap(body: &str) -> String {
        format!(
            "<SOAP-ENV:Envelope><SOAP-ENV:Body><ns1:callServiceResponse><response>{body}</response></ns1:callServiceResponse></SOAP-ENV:Body></SOAP-ENV:Envelope>"
        )
    }

    #[test]
    fn test_build_envelope_fields() {
        let params = json!({"reference_no": "REF123", "note": "a<b & c"});
        let xml = build_envelope(&creds(), "createOrder", &params).unwrap();

        assert!(xml.starts_with(ENVELOPE_HEADER));
        assert!(xml.ends_with(ENVELOPE_FOOTER));
        assert!(xml.contains("<service>createOrder</service>"));
        assert!(xml.contains("<appToken>token</appToken>"));
        assert!(xml.contains("<appKey>key</appKey>"));
        assert!(xml.contains(r#"<paramsJson><![CDATA[{"reference_no":"REF123","note":"a<b & c"}]]></paramsJson>"#));
    }

    #[test]
    fn test_build_envelope_exact_layout() {
        let xml = build_envelope(&creds(), "getCountry", &json!({})).unwrap();
        let expected = format!(
            "{ENVELOPE_HEADER}\n      <paramsJson><![CDATA[{{}}]]></paramsJson>\n      <appToken>token</appToken>\n      <appKey>key</appKey>\n      <service>getCountry</service>\n{ENVELOPE_FOOTER}"
        );
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_params_json_variants() {
        assert_eq!(params_json(&Value::Null).unwrap(), "{}");
        assert_eq!(params_json(r#"{"raw":true}"#).unwrap(), r#"{"raw":true}"#);
        assert_eq!(params_json(&json!([1, null])).unwrap(), "[1,null]");
        assert_eq!(params_json(&json!({"a": null})).unwrap(), r#"{"a":null}"#);
    }

    #[test]
    fn test_params_json_rejects_non_string_keys() {
        let mut params = std::collections::HashMap::new();
        params.insert(vec![1u8], "x");
        let err = params_json(&params).unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn test_built_envelope_is_well_formed_soap() {
        let xml = build_envelope(&creds(), "getTrackNumber", &json!({"reference_no": ["R<1>"]})).unwrap();
        let mut reader = Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut elements = Vec::new();
        let mut cdata = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    elements.push(String::from_utf8(e.local_name().as_ref().to_vec()).unwrap())
                }
                Event::CData(c) => cdata = Some(String::from_utf8(c.into_inner().to_vec()).unwrap()),
                Event::Eof => break,
                _ => {}
            }
        }

        assert_eq!(
            elements,
            vec!["Envelope", "Body", "callService", "paramsJson", "appToken", "appKey", "service"]
        );
        assert_eq!(cdata.as_deref(), Some(r#"{"reference_no":["R<1>"]}"#));
    }

    #[test]
    fn test_extract_cdata_response() {
        let xml = wrap(r#"<![CDATA[{"ask":"Success","message":"Created"}]]>"#);
        let value = extract_response(&xml).unwrap();
        assert_eq!(value, json!({"ask": "Success", "message": "Created"}));
    }

    #[test]
    fn test_extract_plain_response_case_insensitive() {
        let xml = "<Envelope><RESPONSE>\n  {\"ask\":\"Failure\"}\n</Response></Envelope>";
        assert_eq!(extract_response(xml).unwrap(), json!({"ask": "Failure"}));
    }

    #[test]
    fn test_extract_entity_encoded_response() {
        let xml = wrap("{&quot;message&quot;:&quot;a &lt;b&gt; &amp; &apos;c&apos;&quot;}");
        assert_eq!(extract_response(&xml).unwrap(), json!({"message": "a <b> & 'c'"}));
    }

    #[test]
    fn test_ampersand_decoded_last() {
        assert_eq!(decode_xml_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_xml_entities("&amp;amp;"), "&amp;");
        assert_eq!(decode_xml_entities("&lt;&gt;&quot;&apos;&amp;"), "<>\"'&");
    }

    #[test]
    fn test_extract_missing_response() {
        let err = extract_response("<Envelope><Body/></Envelope>").unwrap_err();
        assert!(matches!(err, ClientError::Protocol(ref m) if m == "missing response element"));
    }

    #[test]
    fn test_extract_empty_response() {
        assert!(matches!(extract_response(&wrap("   ")), Err(ClientError::EmptyResponse)));
        assert!(matches!(extract_response(&wrap("<![CDATA[  ]]>")), Err(ClientError::EmptyResponse)));
        assert!(matches!(extract_response(&wrap("<![CDATA[]]>")), Err(ClientError::EmptyResponse)));
    }

    #[test]
    fn test_extract_invalid_json() {
        let err = extract_response(&wrap("not-json")).unwrap_err();
        assert!(matches!(err, ClientError::ResponseParse(_)));
        assert!(err.to_string().contains("Failed to parse ECCANG response JSON"));
    }

    fn arb_document() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 <>&\"'.,:-]{0,16}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::vec(("[a-zA-Z_]{1,8}", inner), 0..5)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    fn encode_entities(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }

    proptest! {
        #[test]
        fn prop_extract_recovers_document(doc in arb_document(), cdata in any::<bool>(), encoded in any::<bool>()) {
            let mut text = doc.to_string();
            if encoded {
                text = encode_entities(&text);
            }
            if cdata {
                text = format!("<![CDATA[{text}]]>");
            }
            prop_assert_eq!(extract_response(&wrap(&text)).unwrap(), doc);
        }
    }
}
