use std::net::SocketAddr;
use std::sync::Arc;

use ::common::storage::FilesystemStore;
use reqwest::Client;
use reqwest::header::HeaderMap;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tempfile::TempDir;

use school_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, LogConfig, ServerConfig, StorageConfig,
};
use school_server::state::AppState;

/// Upload limit used by every test server.
pub const MAX_AVATAR_SIZE: u64 = 1024;

pub mod routes {
    pub const FACULTY: &str = "/faculty";
    pub const FACULTY_LONGEST_NAME: &str = "/faculty/longest-name";
    pub const STUDENT: &str = "/student";
    pub const STUDENT_COUNT: &str = "/student/count";
    pub const STUDENT_AVERAGE_AGE: &str = "/student/average-age";
    pub const STUDENT_AVERAGE_AGE_COMPUTED: &str = "/student/average-age-computed";
    pub const STUDENT_LAST_FIVE: &str = "/student/last-five";
    pub const AVATAR: &str = "/avatar";

    pub fn faculty(id: i32) -> String {
        format!("/faculty/{id}")
    }

    pub fn faculty_filtered(color: &str) -> String {
        format!("/faculty/filtered?color={color}")
    }

    pub fn faculty_by_color_or_name(term: &str) -> String {
        format!("/faculty/by-color-or-name?colorOrName={term}")
    }

    pub fn faculty_by_student(student_id: i32) -> String {
        format!("/faculty/by-student?studentId={student_id}")
    }

    pub fn student(id: i32) -> String {
        format!("/student/{id}")
    }

    pub fn student_filtered(age: i32) -> String {
        format!("/student/filtered?age={age}")
    }

    pub fn student_age_between(min: i32, max: i32) -> String {
        format!("/student/age-between?min={min}&max={max}")
    }

    pub fn student_by_faculty(faculty_id: i32) -> String {
        format!("/student/by-faculty?facultyId={faculty_id}")
    }

    pub fn student_names_starting_with(letter: &str) -> String {
        format!("/student/names-starting-with?letter={letter}")
    }

    pub fn avatar(id: i32) -> String {
        format!("/avatar/{id}")
    }

    pub fn avatar_from_db(id: i32) -> String {
        format!("/avatar/{id}/from-db")
    }

    pub fn avatar_from_file(id: i32) -> String {
        format!("/avatar/{id}/from-file")
    }

    pub fn avatar_page(page: u64) -> String {
        format!("/avatar?page={page}")
    }
}

/// A running test server backed by an in-memory SQLite database and a
/// temporary avatar directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub avatars_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// Response body as text (lossy).
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let avatars_dir = tempfile::tempdir().expect("Failed to create avatar directory");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            // A single connection keeps every request on the same in-memory database.
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                connect_timeout_secs: 8,
                idle_timeout_secs: None,
                max_lifetime_secs: None,
                sqlx_logging: false,
            },
            storage: StorageConfig {
                avatars_dir: avatars_dir.path().to_path_buf(),
                max_avatar_size: MAX_AVATAR_SIZE,
            },
            log: LogConfig {
                filter: "school_server=debug".to_string(),
            },
        };

        let db = school_server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize database");
        let store = FilesystemStore::new(avatars_dir.path(), MAX_AVATAR_SIZE)
            .await
            .expect("Failed to create avatar store");

        let state = AppState {
            db: db.clone(),
            config: app_config,
            avatar_store: Arc::new(store),
        };

        let app = school_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            avatars_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Upload `file_bytes` as the `field` part of a multipart form.
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    pub async fn upload_avatar(
        &self,
        student_id: i32,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
    ) -> TestResponse {
        self.upload(&routes::avatar(student_id), "avatar", file_name, mime, file_bytes)
            .await
    }

    pub async fn create_faculty(&self, name: &str, color: &str) -> i32 {
        let res = self
            .post(routes::FACULTY, &json!({ "name": name, "color": color }))
            .await;
        assert_eq!(res.status, 200, "Create faculty failed: {}", res.text);
        res.id()
    }

    pub async fn create_student(&self, name: &str, age: i32, faculty_id: Option<i32>) -> i32 {
        let res = self
            .post(
                routes::STUDENT,
                &json!({ "name": name, "age": age, "faculty_id": faculty_id }),
            )
            .await;
        assert_eq!(res.status, 200, "Create student failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let bytes = res.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            bytes,
            text,
            body,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Values of `field` across a JSON array body.
    pub fn pluck(&self, field: &str) -> Vec<Value> {
        self.body
            .as_array()
            .expect("response body should be an array")
            .iter()
            .map(|item| item[field].clone())
            .collect()
    }
}
