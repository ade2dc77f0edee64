//! Subcommand handlers against a mocked admin API.

use std::io::Write;
use std::sync::Arc;

use lexcomply_cli::options::{run_options_with, OptionsArgs};
use lexcomply_cli::records::{
    run_create_with, run_delete_with, run_list_with, run_update_with, CreateArgs, DeleteArgs,
    ListArgs, UpdateArgs,
};
use lexcomply_cli::transfer::{run_copy_with, run_transfer_with, CopyArgs, TransferArgs};
use lexcomply_cli::{exit_code, EXIT_FAILURE, EXIT_OK, EXIT_VALIDATION};
use lexcomply_client::{ApiConfig, LexClient};
use lexcomply_core::{EntityKind, TransferType};
use lexcomply_views::Backend;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(mock_server: &MockServer) -> Arc<dyn Backend> {
    let config = ApiConfig::local_mock(&mock_server.uri()).unwrap();
    Arc::new(LexClient::new(config).unwrap())
}

fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn create_maps_assignments_to_api_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stateMaster/createState"))
        .and(body_partial_json(json!({
            "state_name": "Kerala",
            "state_code": "KL",
            "country": "India"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = CreateArgs {
        kind: EntityKind::State,
        assignments: set(&[("stateName", "Kerala"), ("stateCode", "KL")]),
        file: None,
    };
    let code = run_create_with(backend(&mock_server), &args, false)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn create_uploads_file_before_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/multer/upload"))
        .and(query_param("from", "document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {"filename": "99-notice.pdf"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/documentMaster/createDocument"))
        .and(body_partial_json(json!({
            "document_name": "Factories notification",
            "file_name": "99-notice.pdf"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4 notice").unwrap();

    let args = CreateArgs {
        kind: EntityKind::Document,
        assignments: set(&[
            ("documentName", "Factories notification"),
            ("documentType", "notification"),
        ]),
        file: Some(file.path().to_path_buf()),
    };
    let code = run_create_with(backend(&mock_server), &args, true)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn incomplete_create_exits_with_validation_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let args = CreateArgs {
        kind: EntityKind::Act,
        assignments: set(&[("name", "Factories Act")]),
        file: None,
    };
    let err = run_create_with(backend(&mock_server), &args, false)
        .await
        .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_VALIDATION);
}

#[tokio::test]
async fn server_failure_exits_with_failure_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/eventMaster/createEvent"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = CreateArgs {
        kind: EntityKind::Event,
        assignments: set(&[("eventName", "Factory inspection")]),
        file: None,
    };
    let err = run_create_with(backend(&mock_server), &args, false)
        .await
        .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_FAILURE);
}

#[tokio::test]
async fn list_requests_one_server_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/actMaster/actMasterList"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"rows": [{"_id": "a6", "name": "Mines Act"}], "total": 6}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = ListArgs {
        kind: EntityKind::Act,
        search: None,
        page: 2,
        limit: 5,
        sort: None,
        desc: false,
        parent: None,
    };
    let code = run_list_with(backend(&mock_server), &args, false)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn per_act_list_needs_parent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let args = ListArgs {
        kind: EntityKind::Compliance,
        search: None,
        page: 1,
        limit: 10,
        sort: None,
        desc: false,
        parent: None,
    };
    let err = run_list_with(backend(&mock_server), &args, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--parent"));
}

#[tokio::test]
async fn update_edits_the_listed_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stateMaster/stateList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "s1", "state_name": "Kerala", "state_code": "KL", "country": "India"},
                {"_id": "s2", "state_name": "Goa", "state_code": "GA", "country": "India"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/stateMaster/updateState"))
        .and(body_partial_json(json!({
            "_id": "s2",
            "state_name": "Goa",
            "state_code": "GOA"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = UpdateArgs {
        kind: EntityKind::State,
        id: "s2".into(),
        assignments: set(&[("stateCode", "GOA")]),
        file: None,
        parent: None,
    };
    let code = run_update_with(backend(&mock_server), &args, false)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn update_of_unknown_id_fails_without_writing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stateMaster/stateList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "s1", "state_name": "Kerala", "country": "India"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let args = UpdateArgs {
        kind: EntityKind::State,
        id: "missing".into(),
        assignments: set(&[("stateCode", "X")]),
        file: None,
        parent: None,
    };
    let err = run_update_with(backend(&mock_server), &args, false)
        .await
        .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_FAILURE);
}

#[tokio::test]
async fn per_act_update_needs_parent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let args = UpdateArgs {
        kind: EntityKind::Compliance,
        id: "c1".into(),
        assignments: set(&[("title", "Annual return")]),
        file: None,
        parent: None,
    };
    let err = run_update_with(backend(&mock_server), &args, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--parent"));
}

#[tokio::test]
async fn file_field_set_as_text_is_a_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let args = CreateArgs {
        kind: EntityKind::Document,
        assignments: set(&[
            ("documentName", "Factories notification"),
            ("documentType", "notification"),
            ("file", "x.pdf"),
        ]),
        file: None,
    };
    let err = run_create_with(backend(&mock_server), &args, false)
        .await
        .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_VALIDATION);
}

#[tokio::test]
async fn delete_sends_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/stateMaster/removeState"))
        .and(query_param("id", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = DeleteArgs {
        kind: EntityKind::State,
        id: "s1".into(),
    };
    let code = run_delete_with(backend(&mock_server), &args, true)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn act_options_are_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/actMaster/getInternationalActDrop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "a1", "name": "Factories Act"},
                {"_id": "a2", "name": "Companies Act"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = OptionsArgs {
        kind: EntityKind::Act,
        search: Some("factories".into()),
    };
    let code = run_options_with(backend(&mock_server), &args, false)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn transfer_overrides_preselected_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/complianceMaster/getCompliancePeriodicity"))
        .and(query_param("id", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"periodicity": "Ongoing"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/complianceMaster/complianceTransfer"))
        .and(body_json(json!({
            "compliance_id": "c1",
            "transfer_type": "due_date",
            "due_date": "2026-03-31"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = TransferArgs {
        compliance_id: "c1".into(),
        transfer_type: Some(TransferType::DueDate),
        due_date: Some("2026-03-31".into()),
        event_name: None,
        event_periodicity: None,
    };
    let code = run_transfer_with(backend(&mock_server), &args, false)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn copy_posts_source_and_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/complianceMaster/copyCompliance"))
        .and(body_partial_json(json!({
            "compliance_id": "c1",
            "act_id": "a2",
            "title": "Annual return (copy)"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let args = CopyArgs {
        compliance_id: "c1".into(),
        act: "a2".into(),
        title: Some("Annual return (copy)".into()),
        state: None,
    };
    let code = run_copy_with(backend(&mock_server), &args, false)
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);
}
