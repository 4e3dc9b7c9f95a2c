//! Compact positional-array codec for the sync payload.
//!
//! Every record (`Persist`, `Workspace`, `WorkspaceTab`) is written as an array of
//! its field values in a fixed order, the whole thing is prefixed with a format
//! version, deflated and base64-encoded. The field lists are a wire contract:
//! append new fields at the end, never reorder or remove.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::errors::CodecError;
use crate::types::persist::Persist;

/// Format version written as the first element of every payload.
pub const CODEC_VERSION: i64 = 1;

pub const PERSIST_FIELDS: &[&str] = &["timestamp", "workspaces", "settings"];

pub const WORKSPACE_FIELDS: &[&str] = &[
    "id",
    "name",
    "color",
    "tabs",
    "createdAt",
    "lastOpened",
    "windowId",
    "password",
    "passpeek",
    "failedAttempts",
    "lockUntil",
];

pub const TAB_FIELDS: &[&str] = &["id", "index", "title", "url", "pinned"];

#[derive(Debug, Clone, Copy)]
enum Record {
    Persist,
    Workspace,
    Tab,
}

impl Record {
    fn fields(self) -> &'static [&'static str] {
        match self {
            Record::Persist => PERSIST_FIELDS,
            Record::Workspace => WORKSPACE_FIELDS,
            Record::Tab => TAB_FIELDS,
        }
    }

    /// The record type held in a list-valued field, if any.
    fn child(self, field: &str) -> Option<Record> {
        match (self, field) {
            (Record::Persist, "workspaces") => Some(Record::Workspace),
            (Record::Workspace, "tabs") => Some(Record::Tab),
            _ => None,
        }
    }
}

fn pack(value: &Value, record: Record) -> Result<Value, CodecError> {
    let obj = value
        .as_object()
        .ok_or_else(|| CodecError::Encode(format!("{:?} is not an object", record)))?;

    let mut out = Vec::with_capacity(record.fields().len());
    for field in record.fields() {
        let v = obj.get(*field).unwrap_or(&Value::Null);
        match record.child(field) {
            Some(child) => {
                let items = v
                    .as_array()
                    .ok_or_else(|| CodecError::Encode(format!("{} is not an array", field)))?;
                let packed = items
                    .iter()
                    .map(|item| pack(item, child))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(Value::Array(packed));
            }
            None => out.push(v.clone()),
        }
    }

    // Absent optional fields at the tail cost nothing on the wire.
    while matches!(out.last(), Some(Value::Null)) {
        out.pop();
    }
    Ok(Value::Array(out))
}

fn unpack(value: &Value, record: Record) -> Result<Value, CodecError> {
    let arr = value
        .as_array()
        .ok_or_else(|| CodecError::Decode(format!("{:?} is not an array", record)))?;

    let mut obj = Map::new();
    for (field, v) in record.fields().iter().zip(arr.iter()) {
        let decoded = match record.child(field) {
            Some(child) => {
                let items = v
                    .as_array()
                    .ok_or_else(|| CodecError::Decode(format!("{} is not an array", field)))?;
                Value::Array(
                    items
                        .iter()
                        .map(|item| unpack(item, child))
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
            None => v.clone(),
        };
        obj.insert(field.to_string(), decoded);
    }
    Ok(Value::Object(obj))
}

/// Encodes a `Persist` into the compact text form.
pub fn compress(persist: &Persist) -> Result<String, CodecError> {
    let value = serde_json::to_value(persist).map_err(|e| CodecError::Encode(e.to_string()))?;

    let mut payload = vec![Value::from(CODEC_VERSION)];
    if let Value::Array(fields) = pack(&value, Record::Persist)? {
        payload.extend(fields);
    }

    let json = serde_json::to_vec(&Value::Array(payload))
        .map_err(|e| CodecError::Encode(e.to_string()))?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    let deflated = encoder.finish().map_err(|e| CodecError::Encode(e.to_string()))?;

    Ok(BASE64.encode(deflated))
}

/// Decodes the compact text form, reporting why it failed.
pub fn try_decompress(input: &str) -> Result<Persist, CodecError> {
    let deflated = BASE64
        .decode(input.trim())
        .map_err(|e| CodecError::Decode(format!("base64: {}", e)))?;

    let mut json = Vec::new();
    DeflateDecoder::new(deflated.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| CodecError::Decode(format!("inflate: {}", e)))?;

    let value: Value =
        serde_json::from_slice(&json).map_err(|e| CodecError::Decode(format!("json: {}", e)))?;
    let arr = value
        .as_array()
        .ok_or_else(|| CodecError::Decode("payload is not an array".to_string()))?;

    let version = arr
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| CodecError::Decode("missing format version".to_string()))?;
    if version != CODEC_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let body = Value::Array(arr[1..].to_vec());
    let obj = unpack(&body, Record::Persist)?;
    serde_json::from_value(obj).map_err(|e| CodecError::Decode(format!("shape: {}", e)))
}

/// Decodes the compact text form. Never panics; any failure yields `None`.
pub fn decompress(input: &str) -> Option<Persist> {
    match try_decompress(input) {
        Ok(persist) => Some(persist),
        Err(e) => {
            debug!(error = %e, "Rejected compact payload");
            None
        }
    }
}
