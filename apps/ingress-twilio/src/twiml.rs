//! TwiML `<Response>` documents for messaging webhooks.
//!
//! Only the verbs a messaging webhook can answer with are modelled. An empty
//! document tells Twilio to send nothing back.

use std::fmt;

use axum::response::{IntoResponse, Response};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;
use wr_ingress_common::xml_response;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const ROOT: &str = "Response";

#[derive(Debug, Error)]
pub enum TwimlError {
    #[error("malformed TwiML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("TwiML document has no <Response> root")]
    MissingRoot,
    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),
    #[error("unknown TwiML verb <{0}>")]
    UnknownVerb(String),
    #[error("TwiML document ended inside <{0}>")]
    UnexpectedEof(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub body: String,
    pub to: Option<String>,
    pub from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Message(Message),
    Redirect(Redirect),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingResponse {
    verbs: Vec<Verb>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verb(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn to_xml(&self) -> String {
        if self.verbs.is_empty() {
            return format!("{XML_DECL}<{ROOT}/>");
        }
        let mut out = format!("{XML_DECL}<{ROOT}>");
        for verb in &self.verbs {
            match verb {
                Verb::Message(message) => {
                    out.push_str("<Message");
                    push_attr(&mut out, "to", message.to.as_deref());
                    push_attr(&mut out, "from", message.from.as_deref());
                    out.push('>');
                    out.push_str(&escape(message.body.as_str()));
                    out.push_str("</Message>");
                }
                Verb::Redirect(redirect) => {
                    out.push_str("<Redirect");
                    push_attr(&mut out, "method", redirect.method.as_deref());
                    out.push('>');
                    out.push_str(&escape(redirect.url.as_str()));
                    out.push_str("</Redirect>");
                }
            }
        }
        out.push_str(&format!("</{ROOT}>"));
        out
    }

    pub fn parse(xml: &str) -> Result<Self, TwimlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut root = None;
        loop {
            match reader.read_event()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(_) if root.is_none() => {}
                Event::Empty(e) if root.is_none() => {
                    expect_root(&e)?;
                    root = Some(Self::new());
                }
                Event::Start(e) if root.is_none() => {
                    expect_root(&e)?;
                    root = Some(Self {
                        verbs: read_verbs(&mut reader)?,
                    });
                }
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) => {
                    return Err(TwimlError::UnexpectedRoot(element_name(&e)));
                }
                _ => {}
            }
        }
        root.ok_or(TwimlError::MissingRoot)
    }
}

impl fmt::Display for MessagingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

impl IntoResponse for MessagingResponse {
    fn into_response(self) -> Response {
        xml_response(self.to_xml())
    }
}

fn push_attr(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!(" {name}=\"{}\"", escape(value)));
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn expect_root(e: &BytesStart<'_>) -> Result<(), TwimlError> {
    let name = element_name(e);
    if name == ROOT {
        Ok(())
    } else {
        Err(TwimlError::UnexpectedRoot(name))
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, TwimlError> {
    let Some(attr) = e
        .try_get_attribute(name)
        .map_err(quick_xml::Error::from)?
    else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
    Ok(Some(value.into_owned()))
}

fn element_text(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<String, TwimlError> {
    let end = e.to_end().into_owned();
    let raw = reader.read_text(end.name())?;
    Ok(unescape(raw.trim())
        .map_err(quick_xml::Error::from)?
        .into_owned())
}

fn read_verb(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_content: bool,
) -> Result<Verb, TwimlError> {
    let name = element_name(e);
    let text = if has_content {
        element_text(reader, e)?
    } else {
        String::new()
    };
    match name.as_str() {
        "Message" => Ok(Verb::Message(Message {
            body: text,
            to: attribute(e, "to")?,
            from: attribute(e, "from")?,
        })),
        "Redirect" => Ok(Verb::Redirect(Redirect {
            url: text,
            method: attribute(e, "method")?,
        })),
        _ => Err(TwimlError::UnknownVerb(name)),
    }
}

fn read_verbs(reader: &mut Reader<&[u8]>) -> Result<Vec<Verb>, TwimlError> {
    let mut verbs = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => verbs.push(read_verb(reader, &e, true)?),
            Event::Empty(e) => verbs.push(read_verb(reader, &e, false)?),
            Event::End(_) => return Ok(verbs),
            Event::Eof => return Err(TwimlError::UnexpectedEof(ROOT.to_string())),
            _ => {}
        }
    }
}
