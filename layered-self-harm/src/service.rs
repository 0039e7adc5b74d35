//! The JSON request/response envelope of the annotation service.
//!
//! A request is `{"type": "text", "content": "..."}`. A successful response
//! carries one annotation list under `self-harm`; anything else becomes a
//! `failure` with an error code.

use crate::batch::Outcome;
use crate::mapper::{MentionRecord, Polarity, Status, Temporality};
use crate::pipeline::Annotator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

pub const ANNOTATION_TYPE: &str = "self-harm";
pub const REQUEST_INVALID: &str = "elg.request.invalid";
pub const REQUEST_TOO_LARGE: &str = "elg.request.too.large";
pub const INTERNAL_ERROR: &str = "elg.service.internalError";

const TEXT_ID: &str = "text_001";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub annotator: String,
    pub class: String,
    pub comment: Option<String>,
    pub polarity: Polarity,
    pub status: Status,
    pub temporality: Temporality,
    pub text: String,
    pub dsh_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    pub features: Features,
}

impl From<&MentionRecord> for Annotation {
    fn from(record: &MentionRecord) -> Self {
        Annotation {
            start: record.start,
            end: record.end,
            features: Features {
                annotator: record.annotator.clone(),
                class: record.class.clone(),
                comment: record.comment.clone(),
                polarity: record.polarity,
                status: record.status,
                temporality: record.temporality,
                text: record.text.clone(),
                dsh_type: record.dsh_type.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationsResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub annotations: BTreeMap<String, Vec<Annotation>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub code: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub errors: Vec<StatusMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    Response(AnnotationsResponse),
    Failure(Failure),
}

impl Envelope {
    fn failure(code: &str, text: &str, params: Vec<String>) -> Self {
        Envelope::Failure(Failure {
            errors: vec![StatusMessage {
                code: code.to_string(),
                text: text.to_string(),
                params,
            }],
        })
    }

    pub fn invalid_request() -> Self {
        Envelope::failure(REQUEST_INVALID, "Invalid request message", Vec::new())
    }

    pub fn internal_error(message: String) -> Self {
        Envelope::failure(
            INTERNAL_ERROR,
            "Internal error during processing: {0}",
            vec![message],
        )
    }
}

/// An envelope and the HTTP status it goes out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub envelope: Envelope,
}

impl Reply {
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.envelope).unwrap_or_else(|err| {
            format!(
                r#"{{"failure":{{"errors":[{{"code":"{}","text":"{}"}}]}}}}"#,
                INTERNAL_ERROR,
                err.to_string().replace('"', "'")
            )
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("unknown panic"))
}

/// Answer one request body.
pub fn handle_request(annotator: &Annotator, body: &str) -> Reply {
    let content = match serde_json::from_str::<Request>(body) {
        Ok(Request {
            kind,
            content: Some(content),
        }) if kind == "text" => content,
        Ok(_) | Err(_) => {
            log::warn!("rejecting malformed request");
            return Reply {
                status: 400,
                envelope: Envelope::invalid_request(),
            };
        }
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| annotator.process_text(&content, TEXT_ID)));
    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            log::error!("request failed: {}", err);
            return Reply {
                status: 500,
                envelope: Envelope::internal_error(err.to_string()),
            };
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("request panicked: {}", message);
            return Reply {
                status: 500,
                envelope: Envelope::internal_error(message),
            };
        }
    };

    match outcome {
        Outcome::Annotated(mentions) => {
            let mut annotations = BTreeMap::new();
            annotations.insert(
                ANNOTATION_TYPE.to_string(),
                mentions.iter().map(Annotation::from).collect(),
            );
            Reply {
                status: 200,
                envelope: Envelope::Response(AnnotationsResponse {
                    kind: String::from("annotations"),
                    annotations,
                }),
            }
        }
        Outcome::Skipped(reason) => Reply {
            status: 413,
            envelope: Envelope::failure(REQUEST_TOO_LARGE, "Request too large", vec![reason.to_string()]),
        },
    }
}
