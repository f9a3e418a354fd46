//! End-to-end API tests
//!
//! These tests drive the complete router over in-memory repositories:
//! - Bearer token authentication and caller resolution
//! - Team create/update/get/list/delete with authorization
//! - Short name existence and team formation search
//! - Grading criteria and active system notifications

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use courseteams_api::api::{self, ApiSettings, AppState};
use courseteams_api::auth::jwt::create_token;
use courseteams_api::domain::course::{Course, Exercise};
use courseteams_api::domain::grading::{GradingCriterion, StructuredGradingInstruction};
use courseteams_api::domain::notification::{NotificationType, SystemNotification};
use courseteams_api::domain::repositories::TeamRepository;
use courseteams_api::domain::user::{Authority, User};
use courseteams_api::infrastructure::in_memory_repositories;
use courseteams_api::infrastructure::repositories::InMemoryStore;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

const SECRET: &str = "integration-test-secret";
const APP_NAME: &str = "courseteams";

struct TestApp {
    app: Router,
    store: Arc<InMemoryStore>,
    course: Course,
    exercise: Exercise,
    tutor: User,
    student: User,
    other_student: User,
}

fn user(login: &str, first: &str, last: &str, groups: &[&str], authorities: &[Authority]) -> User {
    User {
        id: Uuid::new_v4(),
        login: login.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(format!("{}@example.org", login)),
        groups: groups.iter().map(|g| g.to_string()).collect(),
        authorities: authorities.iter().copied().collect::<BTreeSet<_>>(),
    }
}

/// Setup test application with a course, an exercise and a few users
fn setup_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());

    let course = Course {
        id: Uuid::new_v4(),
        title: "Software Engineering".to_string(),
        short_name: "se".to_string(),
        student_group_name: "se-students".to_string(),
        teaching_assistant_group_name: "se-tutors".to_string(),
        instructor_group_name: "se-instructors".to_string(),
    };
    let exercise = Exercise {
        id: Uuid::new_v4(),
        course_id: course.id,
        title: "Team project".to_string(),
    };
    store.insert_course(course.clone()).unwrap();
    store.insert_exercise(exercise.clone()).unwrap();

    let tutor = user(
        "tutor",
        "Terry",
        "Tutor",
        &["se-tutors"],
        &[Authority::User, Authority::TeachingAssistant],
    );
    let student = user("ada", "Ada", "Lovelace", &["se-students"], &[Authority::User]);
    let other_student = user("grace", "Grace", "Hopper", &["se-students"], &[Authority::User]);
    for u in [&tutor, &student, &other_student] {
        store.insert_user(u.clone()).unwrap();
    }

    let state = AppState::new(
        in_memory_repositories(store.clone()),
        ApiSettings {
            jwt_secret: SECRET.to_string(),
            application_name: APP_NAME.to_string(),
        },
    );

    TestApp {
        app: api::router(state),
        store,
        course,
        exercise,
        tutor,
        student,
        other_student,
    }
}

fn token(user: &User) -> String {
    create_token(user.id, SECRET, Duration::hours(1)).expect("valid token")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<&User>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("authorization", format!("Bearer {}", token(caller)));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, headers, json)
}

fn team_payload(t: &TestApp, short_name: &str, students: &[&User]) -> Value {
    json!({
        "name": format!("Team {}", short_name),
        "shortName": short_name,
        "exercise": { "id": t.exercise.id },
        "students": students.iter().map(|s| json!({ "id": s.id })).collect::<Vec<_>>(),
    })
}

fn teams_uri(t: &TestApp) -> String {
    format!("/api/exercises/{}/teams", t.exercise.id)
}

async fn create_team(t: &TestApp, short_name: &str, students: &[&User]) -> Value {
    let (status, _, body) = send(
        &t.app,
        "POST",
        &teams_uri(t),
        Some(&t.tutor),
        Some(team_payload(t, short_name, students)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body
}

#[tokio::test]
async fn test_health_check() {
    let t = setup_app();

    let response = t
        .app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let t = setup_app();
    let (status, _, body) = send(&t.app, "GET", &teams_uri(&t), None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_token_for_unknown_user_is_unauthorized() {
    let t = setup_app();
    let ghost = user("ghost", "", "", &[], &[Authority::Admin]);

    let (status, _, _) = send(&t.app, "GET", &teams_uri(&t), Some(&ghost), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tutor_creates_team_with_alert_headers() {
    let t = setup_app();

    let (status, headers, body) = send(
        &t.app,
        "POST",
        &teams_uri(&t),
        Some(&t.tutor),
        Some(team_payload(&t, "alpha", &[&t.student])),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap();
    assert_eq!(body["shortName"], "alpha");
    assert_eq!(body["exercise"]["id"], t.exercise.id.to_string());
    assert_eq!(body["students"][0]["login"], "ada");
    assert_eq!(body["students"][0]["name"], "Ada Lovelace");
    assert_eq!(headers["location"], format!("/api/teams/{}", id).as_str());
    assert_eq!(headers["x-courseteams-alert"], "courseteams.team.created");
    assert_eq!(headers["x-courseteams-params"], id);
}

#[tokio::test]
async fn test_create_with_id_is_bad_request() {
    let t = setup_app();
    let mut payload = team_payload(&t, "alpha", &[]);
    payload["id"] = json!(Uuid::new_v4());

    let (status, _, body) = send(&t.app, "POST", &teams_uri(&t), Some(&t.tutor), Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A new team cannot already have an ID");
}

#[tokio::test]
async fn test_create_without_name_is_bad_request() {
    let t = setup_app();
    let payload = json!({
        "shortName": "alpha",
        "exercise": { "id": t.exercise.id },
    });

    let (status, _, body) = send(&t.app, "POST", &teams_uri(&t), Some(&t.tutor), Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_update_with_unparsable_body_is_bad_request() {
    let t = setup_app();
    let request = Request::builder()
        .method("PUT")
        .uri(teams_uri(&t))
        .header("authorization", format!("Bearer {}", token(&t.tutor)))
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_query_params_are_bad_request() {
    let t = setup_app();
    let search_uri = format!(
        "/api/courses/{}/exercises/{}/team-search-users",
        t.course.id, t.exercise.id
    );

    for uri in ["/api/teams", search_uri.as_str()] {
        let (status, _, body) = send(&t.app, "GET", uri, Some(&t.tutor), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_create_for_mismatched_exercise_is_bad_request() {
    let t = setup_app();
    let mut payload = team_payload(&t, "alpha", &[]);
    payload["exercise"]["id"] = json!(Uuid::new_v4());

    let (status, _, _) = send(&t.app, "POST", &teams_uri(&t), Some(&t.tutor), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_cannot_create_team() {
    let t = setup_app();
    let (status, _, _) = send(
        &t.app,
        "POST",
        &teams_uri(&t),
        Some(&t.student),
        Some(team_payload(&t, "alpha", &[])),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(t.store.find_by_short_name("alpha").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_short_name_conflicts() {
    let t = setup_app();
    create_team(&t, "alpha", &[]).await;

    let (status, _, _) = send(
        &t.app,
        "POST",
        &teams_uri(&t),
        Some(&t.tutor),
        Some(team_payload(&t, "alpha", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_member_can_get_team_but_others_cannot() {
    let t = setup_app();
    let created = create_team(&t, "alpha", &[&t.student]).await;
    let uri = format!("{}/{}", teams_uri(&t), created["id"].as_str().unwrap());

    let (status, _, body) = send(&t.app, "GET", &uri, Some(&t.student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shortName"], "alpha");

    let (status, _, _) = send(&t.app, "GET", &uri, Some(&t.other_student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_with_wrong_exercise_is_bad_request() {
    let t = setup_app();
    let created = create_team(&t, "alpha", &[]).await;
    let uri = format!(
        "/api/exercises/{}/teams/{}",
        Uuid::new_v4(),
        created["id"].as_str().unwrap()
    );

    let (status, _, _) = send(&t.app, "GET", &uri, Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_teams_for_exercise() {
    let t = setup_app();
    create_team(&t, "alpha", &[&t.student]).await;
    create_team(&t, "beta", &[&t.other_student]).await;

    let (status, _, body) = send(&t.app, "GET", &teams_uri(&t), Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::OK);

    let mut short_names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|team| team["shortName"].as_str().unwrap())
        .collect();
    short_names.sort();
    assert_eq!(short_names, ["alpha", "beta"]);

    let (status, _, _) = send(&t.app, "GET", &teams_uri(&t), Some(&t.student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_team() {
    let t = setup_app();
    let created = create_team(&t, "alpha", &[&t.student]).await;

    let mut payload = team_payload(&t, "alpha", &[&t.student, &t.other_student]);
    payload["id"] = created["id"].clone();
    payload["name"] = json!("Renamed");

    let (status, headers, body) =
        send(&t.app, "PUT", &teams_uri(&t), Some(&t.tutor), Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["students"].as_array().unwrap().len(), 2);
    assert_eq!(headers["x-courseteams-alert"], "courseteams.team.updated");
}

#[tokio::test]
async fn test_update_of_missing_team_is_not_found() {
    let t = setup_app();
    let mut payload = team_payload(&t, "alpha", &[]);
    payload["id"] = json!(Uuid::new_v4());

    let (status, _, _) = send(&t.app, "PUT", &teams_uri(&t), Some(&t.tutor), Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_team() {
    let t = setup_app();
    let created = create_team(&t, "alpha", &[]).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("{}/{}", teams_uri(&t), id);

    let (status, _, _) = send(&t.app, "DELETE", &uri, Some(&t.student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, headers, _) = send(&t.app, "DELETE", &uri, Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-courseteams-alert"], "courseteams.team.deleted");
    assert_eq!(headers["x-courseteams-params"], id);

    let (status, _, _) = send(&t.app, "GET", &uri, Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_team_is_not_found() {
    let t = setup_app();
    let uri = format!("{}/{}", teams_uri(&t), Uuid::new_v4());

    let (status, _, body) = send(&t.app, "DELETE", &uri, Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Team not found"));
}

#[tokio::test]
async fn test_exists_team_by_short_name() {
    let t = setup_app();
    create_team(&t, "alpha", &[]).await;

    let (status, _, body) = send(&t.app, "GET", "/api/teams?shortName=alpha", Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let (_, _, body) = send(&t.app, "GET", "/api/teams?shortName=omega", Some(&t.tutor), None).await;
    assert_eq!(body, json!(false));
}

#[tokio::test]
async fn test_search_users_in_course() {
    let t = setup_app();
    let created = create_team(&t, "alpha", &[&t.student]).await;
    let base = format!(
        "/api/courses/{}/exercises/{}/team-search-users",
        t.course.id, t.exercise.id
    );

    let (status, _, _) = send(&t.app, "GET", &format!("{}?loginOrName=ad", base), Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&t.app, "GET", &format!("{}?loginOrName=ad", base), Some(&t.student), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(&t.app, "GET", &format!("{}?loginOrName=love", base), Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["login"], "ada");
    assert_eq!(hits[0]["assignedTeamId"], created["id"]);

    let (status, _, _) = send(&t.app, "GET", &format!("{}?loginOrName=love", base), Some(&t.student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_grading_criteria_for_exercise() {
    let t = setup_app();
    let criterion_id = Uuid::new_v4();
    t.store
        .insert_grading_criterion(GradingCriterion {
            id: criterion_id,
            exercise_id: t.exercise.id,
            title: Some("Code quality".to_string()),
            structured_grading_instructions: vec![StructuredGradingInstruction {
                id: Uuid::new_v4(),
                criterion_id,
                credits: 2.0,
                grading_scale: "good".to_string(),
                instruction_description: "Readable code".to_string(),
                feedback: "Nice and clean".to_string(),
                usage_count: 0,
            }],
        })
        .unwrap();
    let uri = format!("/api/exercises/{}/grading-criteria", t.exercise.id);

    let (status, _, body) = send(&t.app, "GET", &uri, Some(&t.tutor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Code quality");
    assert_eq!(body[0]["structuredGradingInstructions"][0]["credits"], 2.0);

    let (status, _, _) = send(&t.app, "GET", &uri, Some(&t.student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_active_system_notifications() {
    let t = setup_app();
    let now = Utc::now();
    let notification = |title: &str, start, end| SystemNotification {
        id: Uuid::new_v4(),
        title: title.to_string(),
        text: None,
        notification_type: NotificationType::Info,
        notification_date: start,
        expire_date: end,
    };
    t.store
        .insert_system_notification(notification("current", now - Duration::hours(1), None))
        .unwrap();
    t.store
        .insert_system_notification(notification(
            "expired",
            now - Duration::days(2),
            Some(now - Duration::days(1)),
        ))
        .unwrap();

    let (status, _, body) = send(
        &t.app,
        "GET",
        "/api/system-notifications/active",
        Some(&t.student),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["current"]);
}
