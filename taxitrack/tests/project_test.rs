mod common;

use chrono::NaiveDate;
use common::{project, FakeSheet};
use taxitrack::models::{ProjectStatus, Snapshot};

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

async fn sheet_with_projects() -> FakeSheet {
    FakeSheet::spawn_with(Snapshot {
        projects: vec![
            project("26.01", ProjectStatus::Received),
            project("26.02", ProjectStatus::InProgress),
            project("26.03", ProjectStatus::Ready),
        ],
        ..Snapshot::default()
    })
    .await
}

#[tokio::test]
async fn send_to_tannery_moves_projects_with_note() {
    let sheet = sheet_with_projects().await;
    let mut store = sheet.connected_store().await;

    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let updated = store
        .send_to_tannery(
            &ids(&["26.01", "26.02"]),
            "Hide & Horn Tannery",
            date,
            Some("Rush order"),
        )
        .await
        .expect("Failed to send to tannery");

    assert_eq!(updated.len(), 2);
    for project in &updated {
        assert_eq!(project.status, ProjectStatus::AtTannery);
        assert_eq!(
            project.notes.as_deref(),
            Some("Sent to Hide & Horn Tannery on Jan 5, 2026 - Rush order")
        );
    }
    assert_eq!(
        store.project("26.01").unwrap().status,
        ProjectStatus::AtTannery
    );

    let request = sheet
        .requests()
        .into_iter()
        .find(|r| r.action == "batchUpdateProjects")
        .expect("No batch request sent");
    assert_eq!(request.body["status"], "At Tannery");
    assert_eq!(request.body["project_ids"][1], "26.02");

    let remote = sheet.data();
    assert_eq!(remote.projects[0].status, ProjectStatus::AtTannery);
    assert_eq!(remote.projects[2].status, ProjectStatus::Ready);
}

#[tokio::test]
async fn tannery_refuses_ineligible_projects() {
    let sheet = sheet_with_projects().await;
    let mut store = sheet.connected_store().await;

    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let err = store
        .send_to_tannery(&ids(&["26.01", "26.03"]), "Hide & Horn", date, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "bad_request");

    let err = store
        .send_to_tannery(&ids(&["26.01"]), "   ", date, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "bad_request");

    assert!(!sheet.actions().iter().any(|a| a == "batchUpdateProjects"));
    assert_eq!(
        store.project("26.01").unwrap().status,
        ProjectStatus::Received
    );
}

#[tokio::test]
async fn completing_a_project_stamps_completion_time() {
    let sheet = sheet_with_projects().await;
    let mut store = sheet.connected_store().await;

    let project = store
        .update_project_status("26.03", ProjectStatus::Completed, None)
        .await
        .expect("Failed to complete project");
    assert_eq!(project.status, ProjectStatus::Completed);
    assert!(project.completed_at.is_some());

    let request = sheet
        .requests()
        .into_iter()
        .find(|r| r.action == "updateProjectStatus")
        .expect("No status request sent");
    assert!(request.body.get("notes").is_none());
}

#[tokio::test]
async fn batch_update_with_unknown_project_changes_nothing() {
    let sheet = sheet_with_projects().await;
    let mut store = sheet.connected_store().await;

    let err = store
        .batch_update_projects(&ids(&["26.01", "26.99"]), ProjectStatus::Finishing, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert_eq!(
        store.project("26.01").unwrap().status,
        ProjectStatus::Received
    );
}

#[tokio::test]
async fn status_change_is_kept_locally_when_sheet_fails() {
    let sheet = sheet_with_projects().await;
    let mut store = sheet.connected_store().await;

    sheet.set_failing(true);
    let project = store
        .update_project_status("26.02", ProjectStatus::Finishing, Some("Eyes set"))
        .await
        .expect("Status change should be kept locally");
    assert_eq!(project.status, ProjectStatus::Finishing);
    assert_eq!(project.notes.as_deref(), Some("Eyes set"));
    assert!(!store.is_syncing());
    assert_eq!(store.failed_records().len(), 1);
}
