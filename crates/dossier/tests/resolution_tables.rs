use dossier::config::ResolutionConfig;
use dossier::resolution::{
    aggregate_checklist_status, classify_entity, ChecklistProgress, LockerConfigError,
    LockerLookupView, RequiredDocuments, ResolutionTables, SubmittedChecklistRecord, MISSED,
};
use std::fs;
use std::path::PathBuf;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dossier-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("write scratch file");
    path
}

fn submitted(document_name: &str, verified_by: &str) -> SubmittedChecklistRecord {
    SubmittedChecklistRecord {
        document_name: document_name.to_string(),
        is_submitted: "Yes".to_string(),
        verified_by: Some(verified_by.to_string()),
        reviewed_by: Some("Meera Nayak".to_string()),
        verified_date: Some("2024-03-12".to_string()),
        file_path: Some(format!("checklists/40273_{}.pdf", document_name.replace(' ', "_"))),
        uploaded_by: Some("hr.admin".to_string()),
        upload_date: Some("2024-03-12".to_string()),
    }
}

#[test]
fn default_configuration_uses_standard_table() {
    let tables = ResolutionTables::from_config(&ResolutionConfig {
        locker_table: None,
        strict_lockers: true,
    })
    .expect("standard table is disjoint");

    assert_eq!(tables.lockers.ranges().len(), 65);
    assert_eq!(tables.required_documents.len(), 22);

    let view = LockerLookupView::from(tables.lockers.resolve("42808").expect("numeric code"));
    assert_eq!(view.group.as_deref(), Some("A5"));
    assert_eq!(view.locker, Some(1));
}

#[test]
fn configured_csv_replaces_standard_table() {
    let path = scratch_file(
        "lockers.csv",
        "group,start,end,locker\nN1,1000,1999,7\nN2,2000,2999,8\n",
    );

    let tables = ResolutionTables::from_config(&ResolutionConfig {
        locker_table: Some(path.clone()),
        strict_lockers: true,
    })
    .expect("csv table loads");
    fs::remove_file(&path).ok();

    let assignment = tables
        .lockers
        .resolve("2000")
        .expect("numeric code")
        .expect("in range");
    assert_eq!(assignment.group, "N2");
    assert_eq!(assignment.locker_number, 8);
    assert!(tables.lockers.resolve("40273").expect("numeric").is_none());
}

#[test]
fn strict_configuration_rejects_overlapping_csv() {
    let path = scratch_file(
        "overlap.csv",
        "group,start,end,locker\nN1,1000,2000,7\nN2,2000,2999,8\n",
    );

    let strict = ResolutionTables::from_config(&ResolutionConfig {
        locker_table: Some(path.clone()),
        strict_lockers: true,
    });
    assert!(matches!(strict, Err(LockerConfigError::Overlap { .. })));

    let permissive = ResolutionTables::from_config(&ResolutionConfig {
        locker_table: Some(path.clone()),
        strict_lockers: false,
    })
    .expect("permissive table loads");
    fs::remove_file(&path).ok();

    let shared = permissive
        .lockers
        .resolve("2000")
        .expect("numeric code")
        .expect("in range");
    assert_eq!(shared.group, "N1");
}

#[test]
fn missing_locker_file_is_an_io_error() {
    let result = ResolutionTables::from_config(&ResolutionConfig {
        locker_table: Some(PathBuf::from("/nonexistent/dossier/lockers.csv")),
        strict_lockers: true,
    });
    assert!(matches!(result, Err(LockerConfigError::Io(_))));
}

#[test]
fn onboarding_report_tracks_resubmissions() {
    let required = RequiredDocuments::standard();
    let history = vec![
        submitted("Appointment Letter", "Ravi Kumar"),
        submitted("PAN Card", "Ravi Kumar"),
        submitted("Offer Letter Draft", "Ravi Kumar"),
        submitted("PAN Card", "Latha Rao"),
    ];

    let report = aggregate_checklist_status(&required, &history);

    assert_eq!(report.len(), required.len());
    assert_eq!(report[0].document_name, "Appointment Letter");
    assert_eq!(report[0].is_submitted, "Yes");
    let pan = report
        .iter()
        .find(|entry| entry.document_name == "PAN Card")
        .expect("pan card listed");
    assert_eq!(pan.verified_by.as_deref(), Some("Latha Rao"));
    assert!(report
        .iter()
        .all(|entry| entry.document_name != "Offer Letter Draft"));

    let progress = ChecklistProgress::from_entries(&report);
    assert_eq!(progress.submitted, 2);
    assert_eq!(progress.missed, 20);
    assert!(report
        .iter()
        .filter(|entry| entry.is_missed())
        .all(|entry| entry.is_submitted == MISSED));
}

#[test]
fn entity_names_follow_code_prefix() {
    assert_eq!(classify_entity("71234"), "Manipal Energy & Infratech Limited");
    assert_eq!(classify_entity("9"), "Westtek Enterprises Private Limited");
    assert_eq!(classify_entity(""), "Unknown Entity");
    assert_eq!(classify_entity("E100"), "Unknown Entity");
}
