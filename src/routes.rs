use crate::checks::{NewStudent, StudentPatch};
use crate::error::{AppError, During, Operation};
use crate::model::Student;
use crate::stats::{StudentGpa, with_gpa};
use crate::store::Store;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub store: Store,
    pub client_dir: PathBuf,
}

type ApiResult<T> = Result<T, crate::error::ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(entry_page).post(create_student))
        .route(
            "/student/{roll_no}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/allStudents", get(all_students))
        .route("/studentsGPA", get(students_gpa))
        .fallback(entry_page)
        .with_state(state)
}

async fn create_student(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewStudent>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let op = Operation::Create;
    let Json(new) = body.during(op)?;
    let student = new.validate().during(op)?;
    state.store.insert(&student).await.during(op)?;
    info!(student = %student, "student added");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Student added successfully", "student": student })),
    ))
}

async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(roll_no): Path<String>,
) -> ApiResult<Json<Student>> {
    let op = Operation::Fetch;
    let student = state.store.find(&roll_no).await.during(op)?;
    student.map(Json).ok_or(AppError::NotFound).during(op)
}

async fn all_students(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Student>>> {
    Ok(Json(state.store.all().await.during(Operation::List)?))
}

async fn students_gpa(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StudentGpa>>> {
    let students = state.store.all().await.during(Operation::ListGpa)?;
    Ok(Json(students.iter().map(with_gpa).collect()))
}

async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(roll_no): Path<String>,
    body: Result<Json<StudentPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let op = Operation::Update;
    let Json(patch) = body.during(op)?;
    let updated = state
        .store
        .update(&roll_no, patch)
        .await
        .during(op)?
        .ok_or(AppError::NotFound)
        .during(op)?;
    info!(student = %updated, "student updated");
    Ok(Json(json!({
        "message": "Student updated successfully",
        "updatedStudent": updated,
    })))
}

async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(roll_no): Path<String>,
) -> ApiResult<Json<Value>> {
    let op = Operation::Delete;
    let deleted = state
        .store
        .delete(&roll_no)
        .await
        .during(op)?
        .ok_or(AppError::NotFound)
        .during(op)?;
    info!(student = %deleted, "student deleted");
    Ok(Json(json!({
        "message": "Student deleted successfully",
        "deletedStudent": deleted,
    })))
}

/// Any other GET receives the client's entry page.
async fn entry_page(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method != Method::GET {
        return not_found("no such route");
    }
    let path = state.client_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read entry page");
            not_found("entry page is not available")
        }
    }
}

fn not_found(error: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not found", "error": error })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::memory_store;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header::CONTENT_TYPE};
    use tower::ServiceExt;

    async fn app() -> Router {
        router(Arc::new(AppState {
            store: memory_store().await,
            client_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("client"),
        }))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn all_scores(value: i64) -> Value {
        json!({"Java": value, "CPP": value, "Python": value, "GenAI": value, "FSD": value})
    }

    #[tokio::test]
    async fn amy_scenario() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Amy", "rollNo": "R1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Student added successfully");
        assert_eq!(body["student"]["rollNo"], "R1");

        let (status, body) = call(&app, Method::GET, "/student/R1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"name": "Amy", "rollNo": "R1", "scores": all_scores(0)})
        );

        let (status, body) = call(
            &app,
            Method::PUT,
            "/student/R1",
            Some(json!({"scores": all_scores(100)})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student updated successfully");
        assert_eq!(body["updatedStudent"]["name"], "Amy");

        let (status, body) = call(&app, Method::GET, "/studentsGPA", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "Amy", "rollNo": "R1", "gpa": "100.00"}]));
    }

    #[tokio::test]
    async fn updated_scores_show_in_list() {
        let app = app().await;
        call(&app, Method::POST, "/", Some(json!({"name": "Bob", "rollNo": "R2"}))).await;
        let scores = json!({"Java": 80, "CPP": 90, "Python": 70, "GenAI": 100, "FSD": 60});
        call(&app, Method::PUT, "/student/R2", Some(json!({"scores": scores}))).await;

        let (status, body) = call(&app, Method::GET, "/allStudents", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "Bob", "rollNo": "R2", "scores": scores}]));

        let (_, body) = call(&app, Method::GET, "/studentsGPA", None).await;
        assert_eq!(body[0]["gpa"], "80.00");
    }

    #[tokio::test]
    async fn unknown_roll_no_is_not_found() {
        let app = app().await;
        for method in [Method::GET, Method::DELETE] {
            let (status, body) = call(&app, method, "/student/nobody", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], "Student not found");
        }
        let (status, _) = call(
            &app,
            Method::PUT,
            "/student/nobody",
            Some(json!({"scores": all_scores(1)})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_student() {
        let app = app().await;
        call(&app, Method::POST, "/", Some(json!({"name": "Amy", "rollNo": "R1"}))).await;
        let (status, body) = call(&app, Method::DELETE, "/student/R1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedStudent"]["name"], "Amy");

        let (status, _) = call(&app, Method::GET, "/student/R1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, body) = call(&app, Method::GET, "/allStudents", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn invalid_bodies_are_rejected() {
        let app = app().await;
        let (status, body) = call(&app, Method::POST, "/", Some(json!({"name": "Amy"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to add student");
        assert!(body["error"].is_string());

        let (status, _) = call(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Amy", "rollNo": "R1", "grade": "A"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, Method::POST, "/", Some(json!({"name": "", "rollNo": "R1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        call(&app, Method::POST, "/", Some(json!({"name": "Amy", "rollNo": "R1"}))).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            "/student/R1",
            Some(json!({"scores": {"Java": null}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to update student");
    }

    #[tokio::test]
    async fn null_update_fields_are_rejected() {
        let app = app().await;
        call(&app, Method::POST, "/", Some(json!({"name": "Amy", "rollNo": "R1"}))).await;
        for body in [
            json!({"scores": null}),
            json!({"name": null}),
            json!({"name": null, "rollNo": null}),
        ] {
            let (status, body) = call(&app, Method::PUT, "/student/R1", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Failed to update student");
        }
        let (_, body) = call(&app, Method::GET, "/student/R1", None).await;
        assert_eq!(body["name"], "Amy");
    }

    #[tokio::test]
    async fn duplicate_roll_no_conflicts() {
        let app = app().await;
        call(&app, Method::POST, "/", Some(json!({"name": "Amy", "rollNo": "R1"}))).await;
        call(&app, Method::POST, "/", Some(json!({"name": "Bob", "rollNo": "R2"}))).await;
        let (status, _) = call(&app, Method::POST, "/", Some(json!({"name": "Eve", "rollNo": "R1"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = call(&app, Method::PUT, "/student/R2", Some(json!({"rollNo": "R1"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unmatched_get_serves_entry_page() {
        let app = app().await;
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/some/page").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Students List"));

        let (status, _) = call(&app, Method::POST, "/some/page", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
