// ABOUTME: CloudEvents envelope exchanged with hook and lifecycle plugins over stdio.
// ABOUTME: Parses plugin responses and builds requests carrying variable data.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Write};

use crate::error::Result;
use crate::runner::InputStream;

pub const SPEC_VERSION: &str = "1.0";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Event types defined by the plugin contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleEventType {
    ListHookResponse,
    ValidateHookRequest,
    ValidateHookResponse,
    GetStateHookRequest,
    GetStateHookResponse,
    PreDeployLifecycleRequest,
    DeployLifecycleRequest,
    PostDeployLifecycleRequest,
}

impl ModuleEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListHookResponse => "com.ibm.techzone.cli.hook.list.response",
            Self::ValidateHookRequest => "com.ibm.techzone.cli.hook.validate.request",
            Self::ValidateHookResponse => "com.ibm.techzone.cli.hook.validate.response",
            Self::GetStateHookRequest => "com.ibm.techzone.cli.hook.get_state.request",
            Self::GetStateHookResponse => "com.ibm.techzone.cli.hook.get_state.response",
            Self::PreDeployLifecycleRequest => "com.ibm.techzone.cli.lifecycle.pre_deploy.request",
            Self::DeployLifecycleRequest => "com.ibm.techzone.cli.lifecycle.deploy.request",
            Self::PostDeployLifecycleRequest => {
                "com.ibm.techzone.cli.lifecycle.post_deploy.request"
            }
        }
    }
}

impl fmt::Display for ModuleEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable a module accepts or was given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDataVarInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload carried in the `data` field of module events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<EventDataVarInfo>,
}

impl EventData {
    pub fn variable(&self, name: &str) -> Option<&EventDataVarInfo> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// CloudEvents 1.0 structured-mode JSON envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEvent {
    pub specversion: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub id: String,
    /// Kept verbatim; plugins emit timestamps with and without offsets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ModuleEvent {
    /// Build an event with a fresh id and the current time.
    pub fn new(
        event_type: ModuleEventType,
        source: impl Into<String>,
        data: &EventData,
    ) -> Result<Self> {
        Ok(Self {
            specversion: SPEC_VERSION.to_string(),
            event_type: event_type.as_str().to_string(),
            source: source.into(),
            subject: None,
            id: uuid::Uuid::new_v4().to_string(),
            time: Some(Utc::now().to_rfc3339()),
            datacontenttype: Some(JSON_CONTENT_TYPE.to_string()),
            data: Some(serde_json::to_value(data)?),
        })
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        serde_json::to_writer(out, self)?;
        Ok(())
    }

    pub fn is_type(&self, event_type: ModuleEventType) -> bool {
        self.event_type == event_type.as_str()
    }

    /// Decode the payload. A missing payload is empty data.
    pub fn event_data(&self) -> Result<EventData> {
        match &self.data {
            Some(value) => Ok(EventData::deserialize(value)?),
            None => Ok(EventData::default()),
        }
    }

    /// Event time. Timestamps without an offset are taken as UTC.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.time.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    /// Serialize the event as stdin for a plugin run.
    pub fn to_input(&self) -> Result<InputStream> {
        let bytes = serde_json::to_vec(self)?;
        Ok(InputStream::reader(Cursor::new(bytes)))
    }
}
