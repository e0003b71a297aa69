//! Portable export/import of projects.
//!
//! Exports are pretty-printed JSON: a single project is the project object itself, a batch
//! is `{ "projects": [...] }`. Non-portable screen fields never appear in either.
//!
//! Imports check only the top-level shape before decoding, then give every imported
//! project a fresh id and fresh timestamps. Screen and hotspot ids are kept: they only need
//! to be unique inside their own project and screen, so re-importing the same file twice
//! cannot make them collide.

pub mod sink;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::{
    error::{ExportError, ImportError},
    log_error, log_info, log_warn,
    models::{CollectionRef, Project},
    store::DocumentStore,
    utils::ids::{new_id, sanitize_file_stem},
};

pub use sink::{DirectoryExportSink, ExportSink};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub contents: String,
}

pub fn encode_project(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&project.portable_copy())
}

pub fn encode_collection(projects: &[Project]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CollectionRef { projects })
}

pub fn project_file_name(name: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.json", sanitize_file_stem(name), at.timestamp_millis())
}

pub fn collection_file_name(at: DateTime<Utc>) -> String {
    format!("senior_helper_projects_{}.json", at.timestamp_millis())
}

pub fn export_project(
    store: &DocumentStore,
    project_id: &str,
    sink: &dyn ExportSink,
) -> Result<ExportedDocument, ExportError> {
    let Some(project) = store.project(project_id) else {
        log_error!("Export failed: project {project_id} not found");
        return Err(ExportError::ProjectNotFound(project_id.to_string()));
    };

    let document = ExportedDocument {
        file_name: project_file_name(&project.name, Utc::now()),
        contents: encode_project(project)?,
    };
    deliver(document, sink)
}

pub fn export_all(
    store: &DocumentStore,
    sink: &dyn ExportSink,
) -> Result<ExportedDocument, ExportError> {
    if store.projects().is_empty() {
        log_warn!("Export skipped: no projects");
        return Err(ExportError::NoProjects);
    }

    let document = ExportedDocument {
        file_name: collection_file_name(Utc::now()),
        contents: encode_collection(store.projects())?,
    };
    deliver(document, sink)
}

fn deliver(
    document: ExportedDocument,
    sink: &dyn ExportSink,
) -> Result<ExportedDocument, ExportError> {
    if let Err(err) = sink.save(&document.file_name, &document.contents) {
        log_error!("Export of {} failed: {err:#}", document.file_name);
        return Err(ExportError::Sink(err));
    }
    log_info!(
        "Exported {} ({} bytes)",
        document.file_name,
        document.contents.len()
    );
    Ok(document)
}

/// Import one project document. Returns the id the project received.
pub fn import_project(store: &mut DocumentStore, document: &str) -> Result<String, ImportError> {
    let result = decode_project(document, Utc::now());
    let project = log_import_failure(result)?;
    let id = project.id.clone();
    store.append_projects(vec![project]);
    log_info!("Imported project {id}");
    Ok(id)
}

/// Import a `{ "projects": [...] }` document. Either every project is appended or none.
pub fn import_projects(
    store: &mut DocumentStore,
    document: &str,
) -> Result<Vec<String>, ImportError> {
    let result = decode_collection(document, Utc::now());
    let projects = log_import_failure(result)?;
    let ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();
    store.append_projects(projects);
    log_info!("Imported {} project(s)", ids.len());
    Ok(ids)
}

fn log_import_failure<T>(result: Result<T, ImportError>) -> Result<T, ImportError> {
    if let Err(err) = &result {
        log_warn!("Import rejected: {err}");
    }
    result
}

pub fn decode_project(document: &str, now: DateTime<Utc>) -> Result<Project, ImportError> {
    let value: Value = serde_json::from_str(document).map_err(ImportError::Parse)?;
    decode_entry(value, now)
}

/// Every entry of the `projects` list goes through the same checks as a single project;
/// one bad entry rejects the whole document.
pub fn decode_collection(document: &str, now: DateTime<Utc>) -> Result<Vec<Project>, ImportError> {
    let value: Value = serde_json::from_str(document).map_err(ImportError::Parse)?;
    let Some(Value::Array(items)) = value.get("projects").cloned() else {
        return Err(ImportError::Validation("expected a `projects` list".into()));
    };

    items
        .into_iter()
        .map(|item| decode_entry(item, now))
        .collect()
}

fn decode_entry(value: Value, now: DateTime<Utc>) -> Result<Project, ImportError> {
    let Value::Object(mut fields) = value else {
        return Err(ImportError::Validation("expected a project object".into()));
    };

    if !has_id(&fields) {
        return Err(ImportError::Validation("project id is missing".into()));
    }
    if !has_text(&fields, "name") {
        return Err(ImportError::Validation("project name is missing".into()));
    }
    if !fields.get("screens").is_some_and(Value::is_array) {
        return Err(ImportError::Validation("project screens must be a list".into()));
    }

    refresh_identity(&mut fields, now);
    serde_json::from_value(Value::Object(fields)).map_err(ImportError::Malformed)
}

fn has_id(fields: &Map<String, Value>) -> bool {
    match fields.get("id") {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

fn has_text(fields: &Map<String, Value>, key: &str) -> bool {
    matches!(fields.get(key), Some(Value::String(text)) if !text.trim().is_empty())
}

fn refresh_identity(fields: &mut Map<String, Value>, now: DateTime<Utc>) {
    let stamp = Value::String(now.to_rfc3339());
    fields.insert("id".into(), Value::String(new_id("project")));
    fields.insert("createdAt".into(), stamp.clone());
    fields.insert("updatedAt".into(), stamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::{ActionKind, Hotspot, HotspotAction, HotspotRect, Screen};
    use crate::settings::StoreSettings;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<(String, String)>>,
    }

    impl ExportSink for RecordingSink {
        fn save(&self, file_name: &str, contents: &str) -> anyhow::Result<()> {
            self.saved
                .lock()
                .unwrap()
                .push((file_name.to_string(), contents.to_string()));
            Ok(())
        }
    }

    struct FailingSink;

    impl ExportSink for FailingSink {
        fn save(&self, _file_name: &str, _contents: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn store() -> DocumentStore {
        DocumentStore::new(Arc::new(MemoryStorage::new()), &StoreSettings::default())
    }

    fn populated() -> (DocumentStore, String) {
        let mut store = store();
        let id = store.create_project("Bank App", Some("send money".into())).unwrap();
        let mut screen = Screen::new("Home", "data:image/png;base64,AAAA", 0);
        screen.image_file = Some("/tmp/home.png".into());
        let screen_id = screen.id.clone();
        store.add_screen(screen);
        store.add_hotspot(
            &screen_id,
            Hotspot::new(HotspotRect::new(10.0, 20.0, 30.0, 5.5)).with_action(
                HotspotAction::new(ActionKind::Message {
                    text: "Well done".into(),
                })
                .with_delay(250),
            ),
        );
        (store, id)
    }

    #[test]
    fn export_project_hands_pretty_json_to_sink() {
        let (store, id) = populated();
        let sink = RecordingSink::default();

        let document = export_project(&store, &id, &sink).unwrap();
        assert!(document.file_name.starts_with("Bank_App_"));
        assert!(document.file_name.ends_with(".json"));
        assert!(document.contents.contains("\n  \"id\""));
        assert!(!document.contents.contains("imageFile"));
        assert_eq!(sink.saved.lock().unwrap().len(), 1);
    }

    #[test]
    fn export_reports_unknown_project_and_empty_store() {
        let sink = RecordingSink::default();
        let store = store();
        assert!(matches!(
            export_project(&store, "nope", &sink),
            Err(ExportError::ProjectNotFound(_))
        ));
        assert!(matches!(export_all(&store, &sink), Err(ExportError::NoProjects)));
        assert!(sink.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn sink_failure_is_surfaced() {
        let (store, _) = populated();
        assert!(matches!(
            export_all(&store, &FailingSink),
            Err(ExportError::Sink(_))
        ));
    }

    #[test]
    fn round_trip_keeps_content_and_refreshes_id() {
        let (mut store, id) = populated();
        let exported = export_project(&store, &id, &RecordingSink::default()).unwrap();

        let new_id = import_project(&mut store, &exported.contents).unwrap();
        assert_ne!(new_id, id);
        assert_eq!(store.projects().len(), 2);
        assert_eq!(store.current_project_id(), Some(id.as_str()));

        let original = store.project(&id).unwrap().portable_copy();
        let imported = store.project(&new_id).unwrap();
        assert_eq!(imported.screens, original.screens);
        assert_eq!(imported.name, original.name);
    }

    #[test]
    fn validation_failures_leave_store_untouched() {
        let mut store = store();
        let cases = [
            r#"{"name":"Demo","screens":[]}"#,
            r#"{"id":"","name":"Demo","screens":[]}"#,
            r#"{"id":"x","name":"","screens":[]}"#,
            r#"{"id":"x","name":"Demo","screens":{}}"#,
            r#"["not", "an", "object"]"#,
        ];
        for case in cases {
            assert!(
                matches!(import_project(&mut store, case), Err(ImportError::Validation(_))),
                "{case} should fail validation"
            );
        }
        assert!(matches!(
            import_project(&mut store, "{ definitely not json"),
            Err(ImportError::Parse(_))
        ));
        assert!(matches!(
            import_projects(&mut store, r#"{"projects":"nope"}"#),
            Err(ImportError::Validation(_))
        ));
        assert!(store.projects().is_empty());
    }

    #[test]
    fn nested_shape_errors_are_reported_as_malformed() {
        let mut store = store();
        let document = r#"{"id":"x","name":"Demo","screens":[{"name":"no id or image"}]}"#;
        assert!(matches!(
            import_project(&mut store, document),
            Err(ImportError::Malformed(_))
        ));
        assert!(store.projects().is_empty());
    }

    #[test]
    fn batch_import_is_all_or_nothing() {
        let mut store = store();
        let document = r#"{"projects":[
            {"id":"a","name":"Ok","screens":[]},
            {"id":"b","screens":[]}
        ]}"#;
        assert!(import_projects(&mut store, document).is_err());
        assert!(store.projects().is_empty());
    }

    #[test]
    fn batch_entries_are_validated_like_single_projects() {
        let mut store = store();
        let cases = [
            r#"{"projects":[{"name":""}]}"#,
            r#"{"projects":[{"id":"a","name":"Ok","screens":[]},{"id":"b","name":"No screens"}]}"#,
            r#"{"projects":[{"id":"a","name":"Ok","screens":[]},{"id":"","name":"Blank id","screens":[]}]}"#,
            r#"{"projects":[{"id":"a","name":"   ","screens":{}}]}"#,
            r#"{"projects":[42]}"#,
        ];
        for case in cases {
            assert!(
                matches!(import_projects(&mut store, case), Err(ImportError::Validation(_))),
                "{case} should fail validation"
            );
        }
        assert!(store.projects().is_empty());
    }

    #[test]
    fn batch_export_reimports_every_project() {
        let (mut store, _) = populated();
        store.create_project("Second", None);
        let exported = export_all(&store, &RecordingSink::default()).unwrap();
        assert!(exported.file_name.starts_with("senior_helper_projects_"));

        let ids = import_projects(&mut store, &exported.contents).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.projects().len(), 4);
    }

    #[test]
    fn imported_timestamps_are_fresh() {
        let now = Utc::now();
        let project = decode_project(
            r#"{"id":"x","name":"Demo","screens":[],"createdAt":"2001-01-01T00:00:00Z","updatedAt":"2001-01-01T00:00:00Z"}"#,
            now,
        )
        .unwrap();
        assert_eq!(project.created_at, now);
        assert_eq!(project.updated_at, now);
        assert_ne!(project.id, "x");
    }
}
