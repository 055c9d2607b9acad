// ABOUTME: Integration tests for the CloudEvents envelope used by plugins.
// ABOUTME: Parses a recorded list hook response and checks request construction.

use atkmod::event::{EventData, EventDataVarInfo, ModuleEvent, ModuleEventType};
use chrono::{Datelike, Timelike};
use std::path::PathBuf;

fn list_response() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join("list-response.json");
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn parses_recorded_list_response() {
    let event = ModuleEvent::from_json(&list_response()).unwrap();

    assert_eq!(event.specversion, "1.0");
    assert!(event.is_type(ModuleEventType::ListHookResponse));
    assert_eq!(event.id, "7208f364-86af-4d18-8fcd-c1f5cd06cdb4");
    assert_eq!(event.datacontenttype.as_deref(), Some("application/json"));

    let names: Vec<String> = event
        .event_data()
        .unwrap()
        .variables
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "TF_VAR_cloud_provider",
            "TF_VAR_cloud_type",
            "TF_VAR_fyre_api_key",
            "TF_VAR_fyre_root_password",
            "TF_VAR_fyre_username",
        ]
    );
}

#[test]
fn naive_timestamp_is_read_as_utc() {
    let event = ModuleEvent::from_json(&list_response()).unwrap();
    let time = event.timestamp().unwrap();

    assert_eq!((time.year(), time.month(), time.day()), (2023, 2, 13));
    assert_eq!((time.hour(), time.minute(), time.second()), (17, 17, 48));
}

#[test]
fn request_round_trips_through_json() {
    let data = EventData {
        variables: vec![EventDataVarInfo {
            name: "TF_VAR_cloud_provider".to_string(),
            value: Some("fyre".to_string()),
            ..EventDataVarInfo::default()
        }],
    };
    let request = ModuleEvent::new(ModuleEventType::DeployLifecycleRequest, "atk", &data)
        .unwrap()
        .with_subject("fyre-vm");

    let parsed = ModuleEvent::from_json(&request.to_json().unwrap()).unwrap();

    assert_eq!(parsed, request);
    assert_eq!(parsed.event_data().unwrap(), data);
    assert!(parsed.timestamp().is_some());
    assert_eq!(parsed.event_type, "com.ibm.techzone.cli.lifecycle.deploy.request");
}

#[test]
fn written_event_reads_back_unchanged() {
    let data = EventData {
        variables: vec![EventDataVarInfo {
            name: "TF_VAR_cloud_type".to_string(),
            default: Some("private".to_string()),
            ..EventDataVarInfo::default()
        }],
    };
    let event = ModuleEvent::new(ModuleEventType::GetStateHookRequest, "atk", &data).unwrap();

    let mut written = Vec::new();
    event.write_to(&mut written).unwrap();

    let parsed = ModuleEvent::from_json(std::str::from_utf8(&written).unwrap()).unwrap();
    assert_eq!(parsed, event);
    assert_eq!(
        parsed.event_data().unwrap().variable("TF_VAR_cloud_type"),
        data.variables.first()
    );
}

#[test]
fn fresh_events_get_distinct_ids() {
    let data = EventData::default();
    let first = ModuleEvent::new(ModuleEventType::ValidateHookRequest, "atk", &data).unwrap();
    let second = ModuleEvent::new(ModuleEventType::ValidateHookRequest, "atk", &data).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn missing_required_field_is_rejected() {
    let result = ModuleEvent::from_json(r#"{"specversion": "1.0", "source": "s", "id": "1"}"#);
    assert!(result.is_err());
}
