use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use time::Date;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use medrec_core::{ident, patient::birthday_serde, Patient};
use medrec_storage::{ObjectStore, RecordStore};

use crate::error::ApiError;
use crate::form::read_patient_form;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct ApiServer {
    pub records: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn ObjectStore>,
    pub public_base_url: String,
    image_dir: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    server: Arc<ApiServer>,
}

impl ApiServer {
    pub fn new(
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn ObjectStore>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            records,
            blobs,
            public_base_url: public_base_url.into(),
            image_dir: None,
        }
    }

    /// Serve a local blob directory at `/images/` (filesystem store mode).
    pub fn with_image_dir(mut self, dir: PathBuf) -> Self {
        self.image_dir = Some(dir);
        self
    }

    pub fn router(self: Arc<Self>) -> Router {
        let image_dir = self.image_dir.clone();
        let app_state = AppState { server: self };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let mut app = Router::new()
            .route(
                "/patients",
                get(list_patients)
                    .post(create_patient)
                    .fallback(method_not_allowed),
            )
            .route(
                "/patients/:id",
                get(get_patient)
                    .put(update_patient)
                    .delete(delete_patient)
                    .fallback(method_not_allowed),
            )
            .fallback(unknown_route)
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
            .layer(cors)
            .layer(CatchPanicLayer::custom(handle_panic))
            .with_state(app_state);

        if let Some(dir) = image_dir {
            app = app.nest_service("/images", ServeDir::new(dir));
        }

        app
    }

    pub async fn serve(self: Arc<Self>, host: &str, port: u16) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("medrec API listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Wire shape of a patient record; the internal blob identifier stays
/// server-side and clients get the derived URL instead.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientView {
    id: i64,
    first_name: String,
    last_name: String,
    #[serde(with = "birthday_serde")]
    birthday: Date,
    description: String,
    primary_doctor: String,
    image_url: String,
}

impl PatientView {
    fn from_patient(patient: Patient, public_base: &str) -> Self {
        let image_url = patient.image_url(public_base);
        Self {
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            birthday: patient.birthday,
            description: patient.description,
            primary_doctor: patient.primary_doctor,
            image_url,
        }
    }
}

/// GET /patients - List all patients
async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<PatientView>>, ApiError> {
    let patients = state.server.records.list().await.map_err(ApiError::Store)?;

    let views = patients
        .into_iter()
        .map(|p| PatientView::from_patient(p, &state.server.public_base_url))
        .collect();

    Ok(Json(views))
}

/// GET /patients/:id - Fetch one patient
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PatientView>, ApiError> {
    let patient = state
        .server
        .records
        .get(id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound(id))?;

    Ok(Json(PatientView::from_patient(
        patient,
        &state.server.public_base_url,
    )))
}

/// POST /patients - Create a patient, uploading the image first
///
/// The blob upload is awaited and its failure aborts the create, so a row
/// can never be inserted with an identifier that has no backing object.
async fn create_patient(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_patient_form(multipart).await?;

    let identifier = match form.image {
        Some(image) => {
            let key = ident::generate();
            state
                .server
                .blobs
                .put(&key, &image.content_type, image.bytes)
                .await
                .map_err(ApiError::Blob)?;
            Some(key)
        }
        None => None,
    };

    let id = state
        .server
        .records
        .insert(&form.fields, identifier.as_deref())
        .await
        .map_err(ApiError::Store)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Patient added successfully",
            "patientId": id
        })),
    ))
}

/// PUT /patients/:id - Update a patient, replacing the image when a new one
/// is supplied
///
/// The old blob is deleted only after the row write succeeds; a failed row
/// write may orphan the freshly uploaded blob but never loses the image the
/// row still points at.
async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = read_patient_form(multipart).await?;

    let current = state
        .server
        .records
        .get(id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound(id))?;

    let (identifier, replaced) = match form.image {
        Some(image) => {
            let key = ident::generate();
            state
                .server
                .blobs
                .put(&key, &image.content_type, image.bytes)
                .await
                .map_err(ApiError::Blob)?;
            (Some(key), current.image_identifier)
        }
        None => (current.image_identifier, None),
    };

    let updated = state
        .server
        .records
        .update(id, &form.fields, identifier.as_deref())
        .await
        .map_err(ApiError::Store)?;
    if !updated {
        // Row vanished between the read and the write.
        return Err(ApiError::NotFound(id));
    }

    if let Some(old_key) = replaced {
        if let Err(err) = state.server.blobs.delete(&old_key).await {
            warn!(key = %old_key, error = %err, "failed to delete replaced image, leaving orphan");
        }
    }

    Ok(Json(serde_json::json!({
        "message": "Patient updated successfully"
    })))
}

/// DELETE /patients/:id - Delete a patient and, best-effort, its image
///
/// Blob deletion happens first so a surviving row never points at a deleted
/// object; a failed blob delete only leaves an orphan and never blocks the
/// row delete.
async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let current = state
        .server
        .records
        .get(id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound(id))?;

    if let Some(key) = &current.image_identifier {
        if let Err(err) = state.server.blobs.delete(key).await {
            warn!(key = %key, error = %err, "failed to delete image, leaving orphan");
        }
    }

    let deleted = state
        .server
        .records
        .delete(id)
        .await
        .map_err(ApiError::Store)?;
    if !deleted {
        return Err(ApiError::NotFound(id));
    }

    Ok(Json(serde_json::json!({
        "message": "Patient deleted successfully"
    })))
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

async fn unknown_route() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Endpoint not found" })),
    )
        .into_response()
}

fn handle_panic(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Internal server error" })),
    )
        .into_response()
}
