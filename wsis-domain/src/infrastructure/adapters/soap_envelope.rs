//! SOAP 1.1 envelopes for the identity server admin services.
//!
//! Only the shapes this crate sends are supported: an operation element in the
//! service namespace whose children are text parameters or flat complex values
//! in a second "types" namespace. Responses are reduced to the text of their
//! `return` elements, or to a [`ServiceError::Fault`].

use crate::domain::errors::{ServiceError, ServiceResult};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const USER_STORE_NS: &str = "http://service.ws.um.carbon.wso2.org";
pub const USER_STORE_TYPES_NS: &str = "http://common.mgt.user.carbon.wso2.org/xsd";
pub const TENANT_NS: &str = "http://services.mgt.tenant.carbon.wso2.org";
pub const TENANT_TYPES_NS: &str = "http://beans.common.stratos.carbon.wso2.org/xsd";

/// Stand-in for sensitive values in traced envelopes
pub const REDACTED: &str = "********";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParamValue {
    Text(String),
    Complex(Vec<(&'static str, String)>),
}

/// A single remote operation call, ready to be rendered into an envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapCall {
    namespace: &'static str,
    types_namespace: Option<&'static str>,
    operation: &'static str,
    one_way: bool,
    params: Vec<(&'static str, ParamValue)>,
}

impl SoapCall {
    /// An operation whose WSDL declares an output message
    pub fn request_response(namespace: &'static str, operation: &'static str) -> Self {
        Self {
            namespace,
            types_namespace: None,
            operation,
            one_way: false,
            params: Vec::new(),
        }
    }

    /// An operation whose WSDL declares no output message
    pub fn one_way(namespace: &'static str, operation: &'static str) -> Self {
        Self {
            one_way: true,
            ..Self::request_response(namespace, operation)
        }
    }

    pub fn with_types(mut self, types_namespace: &'static str) -> Self {
        self.types_namespace = Some(types_namespace);
        self
    }

    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, ParamValue::Text(value.to_string())));
        self
    }

    /// Repeat `name` once per value (array parameters)
    pub fn params<I, S>(mut self, name: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        for value in values {
            self.params.push((name, ParamValue::Text(value.to_string())));
        }
        self
    }

    /// A complex parameter whose fields live in the types namespace
    pub fn complex(mut self, name: &'static str, fields: Vec<(&'static str, String)>) -> Self {
        self.params.push((name, ParamValue::Complex(fields)));
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    pub fn soap_action(&self) -> String {
        format!("urn:{}", self.operation)
    }

    pub fn to_envelope(&self) -> String {
        self.render(|_| false)
    }

    /// The envelope with every parameter or complex field whose name contains
    /// one of `sensitive_fields` (case-insensitive) replaced by [`REDACTED`]
    pub fn to_redacted_envelope(&self, sensitive_fields: &[String]) -> String {
        let sensitive: Vec<String> = sensitive_fields
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| field.to_ascii_lowercase())
            .collect();

        self.render(|name| {
            let name = name.to_ascii_lowercase();
            sensitive.iter().any(|field| name.contains(field.as_str()))
        })
    }

    fn render<F>(&self, redact: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let shown = |name: &str, text: &str| {
            if redact(name) {
                REDACTED.to_string()
            } else {
                escape(text).into_owned()
            }
        };

        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push_str(&format!(
            r#"<soapenv:Envelope xmlns:soapenv="{}" xmlns:ser="{}""#,
            SOAP_ENV_NS, self.namespace
        ));
        if let Some(types) = self.types_namespace {
            xml.push_str(&format!(r#" xmlns:typ="{}""#, types));
        }
        xml.push_str("><soapenv:Header/><soapenv:Body>");
        xml.push_str(&format!("<ser:{}>", self.operation));

        for (name, value) in &self.params {
            match value {
                ParamValue::Text(text) => {
                    xml.push_str(&format!("<ser:{name}>{}</ser:{name}>", shown(name, text)));
                }
                ParamValue::Complex(fields) => {
                    xml.push_str(&format!("<ser:{name}>"));
                    for (field, text) in fields {
                        xml.push_str(&format!(
                            "<typ:{field}>{}</typ:{field}>",
                            shown(field, text)
                        ));
                    }
                    xml.push_str(&format!("</ser:{name}>"));
                }
            }
        }

        xml.push_str(&format!("</ser:{}>", self.operation));
        xml.push_str("</soapenv:Body></soapenv:Envelope>");
        xml
    }
}

/// Decoded body of a successful response: the text of every `return` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapResponse {
    returns: Vec<String>,
}

impl SoapResponse {
    pub fn returns(&self) -> &[String] {
        &self.returns
    }

    pub fn into_strings(self) -> Vec<String> {
        self.returns
    }

    pub fn into_bool(self) -> ServiceResult<bool> {
        match self.single()?.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ServiceError::malformed(format!(
                "expected boolean return, got '{other}'"
            ))),
        }
    }

    pub fn into_i32(self) -> ServiceResult<i32> {
        let raw = self.single()?;
        raw.trim().parse().map_err(|_| {
            ServiceError::malformed(format!("expected integer return, got '{raw}'"))
        })
    }

    fn single(self) -> ServiceResult<String> {
        let mut returns = self.returns.into_iter();
        match (returns.next(), returns.next()) {
            (Some(value), None) => Ok(value),
            (None, _) => Err(ServiceError::malformed("response has no return value")),
            (Some(_), Some(_)) => Err(ServiceError::malformed(
                "expected a single return value, got several",
            )),
        }
    }
}

#[derive(Default)]
struct FaultBuilder {
    code: Option<String>,
    message: Option<String>,
    detail: Vec<String>,
}

impl FaultBuilder {
    fn build(self) -> ServiceError {
        ServiceError::Fault {
            code: self.code.unwrap_or_else(|| "soapenv:Server".to_string()),
            message: self.message.unwrap_or_default(),
            detail: if self.detail.is_empty() {
                None
            } else {
                Some(self.detail.join(" "))
            },
        }
    }
}

/// `xsi:nil` set to either xsd boolean spelling of true
fn is_nil(e: &BytesStart<'_>) -> bool {
    e.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"nil"
            && matches!(attr.value.as_ref(), b"true" | b"1")
    })
}

/// Parse a response envelope.
///
/// A body `Fault` becomes `Err(ServiceError::Fault)`. Anything that is not a
/// SOAP envelope is reported as a malformed response.
pub fn parse_response(xml: &str) -> ServiceResult<SoapResponse> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut saw_envelope = false;
    let mut in_body = false;
    let mut fault: Option<FaultBuilder> = None;
    let mut in_detail = false;
    let mut current_element = String::new();
    let mut in_return = false;
    let mut returns = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                current_element = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match current_element.as_str() {
                    "Envelope" => saw_envelope = true,
                    "Body" => in_body = true,
                    "Fault" if in_body => fault = Some(FaultBuilder::default()),
                    "detail" | "Detail" if fault.is_some() => in_detail = true,
                    "return" if in_body && fault.is_none() => {
                        if is_nil(&e) {
                            in_return = false;
                        } else {
                            in_return = true;
                            returns.push(String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if name.as_ref() == b"return" && in_body && fault.is_none() && !is_nil(&e) {
                    returns.push(String::new());
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?.to_string();
                append_text(&mut fault, in_detail, &current_element, in_return, &mut returns, text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                append_text(&mut fault, in_detail, &current_element, in_return, &mut returns, text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Body" => in_body = false,
                b"return" => in_return = false,
                b"detail" | b"Detail" => in_detail = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_envelope {
        return Err(ServiceError::malformed("response is not a SOAP envelope"));
    }

    match fault {
        Some(fault) => Err(fault.build()),
        None => Ok(SoapResponse { returns }),
    }
}

fn append_text(
    fault: &mut Option<FaultBuilder>,
    in_detail: bool,
    current_element: &str,
    in_return: bool,
    returns: &mut [String],
    text: String,
) {
    if let Some(fault) = fault.as_mut() {
        if in_detail {
            fault.detail.push(text);
            return;
        }
        match current_element {
            // SOAP 1.1 and the SOAP 1.2 equivalents
            "faultcode" | "Value" => fault.code = Some(text),
            "faultstring" | "Text" => fault.message = Some(text),
            _ => {}
        }
    } else if in_return {
        if let Some(last) = returns.last_mut() {
            last.push_str(&text);
        }
    }
}
