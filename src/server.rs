//! HTTP boundary: upload form, report generation endpoint, artifact
//! downloads.
//!
//! The request layer normalizes either submission shape — a repeated `files`
//! part whose base filename is the document key, or one named part per key —
//! into an [`UploadedDocumentSet`] before the validator runs. Produced
//! artifacts are handed out through an in-process registry (artifact name →
//! path) that expires together with the working-directory cleanup, instead of
//! scanning directories per download.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as TokioMutex;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::pipeline::schema::VerificationOutcome;
use crate::pipeline::validate::{validate, UploadedDocument, UploadedDocumentSet};
use crate::pipeline::{self, cleanup};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Artifact name → on-disk path, for names currently inside the cleanup
/// grace window. Registered on pipeline success, dropped when cleanup runs.
#[derive(Clone, Default)]
pub struct ArtifactRegistry {
    inner: Arc<TokioMutex<HashMap<String, PathBuf>>>,
}

impl ArtifactRegistry {
    pub async fn register(&self, name: String, path: PathBuf) {
        self.inner.lock().await.insert(name, path);
    }

    pub async fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.inner.lock().await.get(name).cloned()
    }

    pub async fn remove_many(&self, names: &[String]) {
        let mut map = self.inner.lock().await;
        for name in names {
            map.remove(name);
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub registry: ArtifactRegistry,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
            registry: ArtifactRegistry::default(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    pub report_url: String,
    pub package_url: String,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

// ---------------------------------------------------------------------------
// Router / lifecycle
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(serve_upload_page))
        .route("/generate-report/", post(generate_report))
        .route("/download-file/", get(download_file))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves until the process is stopped. Sweeps working directories
/// orphaned by a previous crash before accepting traffic.
pub async fn serve(config: ServiceConfig) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.work_root)?;
    cleanup::sweep_orphaned(&config.work_root);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Report service listening");

    axum::serve(listener, router(AppState::new(config))).await
}

// ---------------------------------------------------------------------------
// Multipart normalization
// ---------------------------------------------------------------------------

struct Submission {
    order_number: String,
    transaction_type: String,
    verification_status: String,
    documents: UploadedDocumentSet,
}

/// Detect MIME type from file magic bytes; fallback when the part carries no
/// usable Content-Type.
pub fn detect_mime_from_bytes(bytes: &[u8]) -> String {
    if bytes.len() < 4 {
        return "application/octet-stream".into();
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg".into();
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return "image/png".into();
    }
    if bytes.starts_with(b"%PDF") {
        return "application/pdf".into();
    }
    if bytes.len() >= 12 && bytes[..4] == *b"RIFF" && bytes[8..12] == *b"WEBP" {
        return "image/webp".into();
    }
    "application/octet-stream".into()
}

async fn read_submission(multipart: &mut Multipart) -> Result<Submission, String> {
    let mut order_number = String::new();
    let mut transaction_type = String::new();
    let mut verification_status = String::new();
    let mut documents = UploadedDocumentSet::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Carga multipart inválida: {e}"))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "order_number" => {
                order_number = field.text().await.map_err(|e| e.to_string())?;
            }
            "transaction_type" => {
                transaction_type = field.text().await.map_err(|e| e.to_string())?;
            }
            "verification_status" => {
                verification_status = field.text().await.map_err(|e| e.to_string())?;
            }
            _ => {
                let original_filename = field.file_name().map(str::to_string);
                let declared_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("No se pudo leer el archivo: {e}"))?
                    .to_vec();

                // Shape (a): repeated "files" part, key = filename stem.
                // Shape (b): one part per key, key = part name.
                let key = if name == "files" {
                    original_filename
                        .as_deref()
                        .unwrap_or("")
                        .split('.')
                        .next()
                        .unwrap_or("")
                        .to_string()
                } else {
                    name
                };
                if key.is_empty() {
                    continue;
                }

                let media_type = declared_type
                    .filter(|t| !t.is_empty() && t != "application/octet-stream")
                    .unwrap_or_else(|| detect_mime_from_bytes(&bytes));

                documents.insert(
                    key.clone(),
                    UploadedDocument {
                        key,
                        bytes,
                        media_type,
                        original_filename,
                    },
                );
            }
        }
    }

    if order_number.trim().is_empty() {
        return Err("Falta el número de orden.".into());
    }

    Ok(Submission {
        order_number,
        transaction_type,
        verification_status,
        documents,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

async fn generate_report(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let submission = match read_submission(&mut multipart).await {
        Ok(s) => s,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    // Fail fast, before any directory exists.
    let category = match validate(&submission.transaction_type, &submission.documents) {
        Ok(category) => category,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let outcome = VerificationOutcome::parse(&submission.verification_status);

    let order = submission.order_number.clone();
    let documents = submission.documents;
    let work_root = state.config.work_root.clone();

    // Rendering and packing are blocking filesystem + CPU work.
    let run = match tokio::task::spawn_blocking(move || {
        pipeline::run(&order, category, outcome, &documents, &work_root)
    })
    .await
    {
        Ok(Ok(run)) => run,
        Ok(Err(e)) => {
            tracing::error!(order = %submission.order_number, error = %e, "Report generation failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Ocurrió un error al generar el informe: {e}"),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Pipeline task aborted");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ocurrió un error al generar el informe.".into(),
            );
        }
    };

    let report_name = artifact_name(&run.report_path);
    let package_name = artifact_name(&run.package_path);
    state
        .registry
        .register(report_name.clone(), run.report_path.clone())
        .await;
    state
        .registry
        .register(package_name.clone(), run.package_path.clone())
        .await;

    // Fire-and-forget: the response must not wait on cleanup.
    let registry = state.registry.clone();
    let grace = state.config.cleanup_grace;
    let working_dir = run.working_dir.clone();
    let names = vec![report_name.clone(), package_name.clone()];
    tokio::spawn(async move {
        cleanup::cleanup_working_dir(&working_dir, grace).await;
        registry.remove_many(&names).await;
    });

    (
        StatusCode::OK,
        Json(GenerateResponse {
            message: "Informe generado con éxito".into(),
            report_url: format!("/download-file/?path={report_name}"),
            package_url: format!("/download-file/?path={package_name}"),
        }),
    )
        .into_response()
}

fn artifact_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct DownloadParams {
    path: String,
}

async fn download_file(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let Some(path) = state.registry.resolve(&params.path).await else {
        return error_response(StatusCode::NOT_FOUND, "Archivo no encontrado.".into());
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mut response = bytes.into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            );
            let disposition = format!("attachment; filename=\"{}\"", params.path);
            response.headers_mut().insert(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            );
            response
        }
        Err(e) => {
            tracing::warn!(file = %params.path, error = %e, "Registered artifact unreadable");
            error_response(StatusCode::NOT_FOUND, "Archivo no encontrado.".into())
        }
    }
}

async fn serve_upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

// ---------------------------------------------------------------------------
// Upload page HTML (self-contained, no external resources)
// ---------------------------------------------------------------------------

const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Informe de Verificación P2P</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917;
      display: flex; flex-direction: column; align-items: center; padding: 32px 16px;
    }
    h1 { font-size: 22px; margin-bottom: 16px; }
    form { width: 100%; max-width: 420px; display: flex; flex-direction: column; gap: 12px; }
    label { font-size: 13px; color: #44403c; }
    input, select {
      width: 100%; padding: 10px; border: 1px solid #d6d3d1; border-radius: 8px; font-size: 14px;
    }
    button {
      padding: 14px; border: none; border-radius: 8px; background: #4a7c59;
      color: white; font-size: 15px; font-weight: 500; cursor: pointer;
    }
    .status { margin-top: 16px; font-size: 14px; text-align: center; }
    .status.error { color: #dc2626; }
    .status.success { color: #16a34a; }
    .status a { display: block; margin-top: 4px; }
  </style>
</head>
<body>
  <h1>Informe de Verificación de Transacción P2P</h1>
  <form id="report-form">
    <label>Número de orden
      <input name="order_number" required>
    </label>
    <label>Tipo de transacción
      <select name="transaction_type">
        <option value="buy">Compra</option>
        <option value="sell">Venta</option>
      </select>
    </label>
    <label>Estado de verificación
      <select name="verification_status">
        <option value="approved">Aprobado</option>
        <option value="rejected">Rechazado</option>
      </select>
    </label>
    <label>Documentos (el nombre de cada archivo debe ser su clave, p. ej. user_profile.png)
      <input type="file" name="files" multiple required>
    </label>
    <button type="submit">Generar informe</button>
  </form>
  <div class="status" id="status"></div>

  <script>
    var form = document.getElementById('report-form');
    var statusEl = document.getElementById('status');

    form.addEventListener('submit', function (e) {
      e.preventDefault();
      var data = new FormData();
      data.append('order_number', form.order_number.value);
      data.append('transaction_type', form.transaction_type.value);
      data.append('verification_status', form.verification_status.value);
      Array.from(form.files.files).forEach(function (f) { data.append('files', f); });

      statusEl.textContent = 'Generando…';
      statusEl.className = 'status';

      fetch('/generate-report/', { method: 'POST', body: data })
        .then(function (r) { return r.json().then(function (j) { return { ok: r.ok, body: j }; }); })
        .then(function (r) {
          if (!r.ok) {
            statusEl.textContent = r.body.error || 'Error al generar el informe';
            statusEl.className = 'status error';
            return;
          }
          statusEl.className = 'status success';
          statusEl.innerHTML = r.body.message +
            '<a href="' + r.body.report_url + '">Descargar informe</a>' +
            '<a href="' + r.body.package_url + '">Descargar paquete</a>';
        })
        .catch(function () {
          statusEl.textContent = 'No se pudo contactar el servidor.';
          statusEl.className = 'status error';
        });
    });
  </script>
</body>
</html>"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::pipeline::schema::{schema_for, TransactionCategory};

    const BOUNDARY: &str = "test-boundary-7431";

    fn tiny_png() -> Vec<u8> {
        use printpdf::image_crate::{DynamicImage, ImageOutputFormat};
        let img = DynamicImage::new_rgb8(4, 4);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
        buf.into_inner()
    }

    /// (name, filename, content_type, data) parts → multipart body.
    fn multipart_body(parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n")
                        .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
                ),
            }
            if let Some(ct) = content_type {
                body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_report(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate-report/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn form_fields<'a>(
        order: &'a str,
        category: &'a str,
        status: &'a str,
    ) -> Vec<(&'a str, Option<&'a str>, Option<&'a str>, &'a [u8])> {
        vec![
            ("order_number", None, None, order.as_bytes()),
            ("transaction_type", None, None, category.as_bytes()),
            ("verification_status", None, None, status.as_bytes()),
        ]
    }

    fn test_state(work_root: &std::path::Path) -> AppState {
        AppState::new(ServiceConfig {
            work_root: work_root.to_path_buf(),
            ..ServiceConfig::default()
        })
    }

    // -- MIME detection -------------------------------------------------------

    #[test]
    fn detect_common_signatures() {
        assert_eq!(detect_mime_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(detect_mime_from_bytes(&[0x89, 0x50, 0x4E, 0x47]), "image/png");
        assert_eq!(detect_mime_from_bytes(b"%PDF-1.4"), "application/pdf");
        assert_eq!(detect_mime_from_bytes(&[1, 2, 3, 4]), "application/octet-stream");
        assert_eq!(detect_mime_from_bytes(&[]), "application/octet-stream");
    }

    // -- Registry -------------------------------------------------------------

    #[tokio::test]
    async fn registry_round_trip() {
        let registry = ArtifactRegistry::default();
        registry.register("a.pdf".into(), PathBuf::from("/tmp/a.pdf")).await;
        assert_eq!(registry.resolve("a.pdf").await, Some(PathBuf::from("/tmp/a.pdf")));
        assert_eq!(registry.resolve("b.pdf").await, None);

        registry.remove_many(&["a.pdf".to_string()]).await;
        assert_eq!(registry.resolve("a.pdf").await, None);
        assert_eq!(registry.len().await, 0);
    }

    // -- Handlers -------------------------------------------------------------

    #[tokio::test]
    async fn health_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn upload_page_served() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("report-form"));
    }

    #[tokio::test]
    async fn invalid_category_is_client_error() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));

        let body = multipart_body(&form_fields("1", "lease", "approved"));
        let response = app.oneshot(post_report(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("lease"));
    }

    #[tokio::test]
    async fn missing_documents_all_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));

        let png = tiny_png();
        let mut parts = form_fields("42", "buy", "approved");
        parts.push(("user_profile", Some("user_profile.png"), Some("image/png"), &png));
        let body = multipart_body(&parts);

        let response = app.oneshot(post_report(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap().to_string();
        for (key, _) in schema_for(TransactionCategory::Buy) {
            if *key != "user_profile" {
                assert!(error.contains(key), "missing {key} in: {error}");
            }
        }
        // No working directory gets created on a validation failure.
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn full_generate_and_download_flow() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let app = router(state.clone());

        let png = tiny_png();
        let mut parts = form_fields("900", "buy", "approved");
        let names: Vec<String> = schema_for(TransactionCategory::Buy)
            .iter()
            .map(|(key, _)| format!("{key}.png"))
            .collect();
        for (i, (key, _)) in schema_for(TransactionCategory::Buy).iter().enumerate() {
            parts.push((*key, Some(names[i].as_str()), Some("image/png"), &png));
        }

        let response = app.clone().oneshot(post_report(multipart_body(&parts))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Informe generado con éxito");
        let report_url = json["report_url"].as_str().unwrap().to_string();
        assert!(report_url.contains("Informe_900.pdf"));
        assert!(json["package_url"].as_str().unwrap().contains("Paquete_900.tar.gz"));

        // Both artifacts are resolvable within the grace window.
        assert_eq!(state.registry.len().await, 2);

        let download = app
            .oneshot(Request::builder().uri(report_url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(
            download.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        let bytes = download.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[tokio::test]
    async fn multibyte_order_number_generates_report() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));

        let png = tiny_png();
        let order: String = std::iter::repeat('中').take(30).collect();
        let mut parts = form_fields(&order, "buy", "approved");
        let names: Vec<String> = schema_for(TransactionCategory::Buy)
            .iter()
            .map(|(key, _)| format!("{key}.png"))
            .collect();
        for (i, (key, _)) in schema_for(TransactionCategory::Buy).iter().enumerate() {
            parts.push((*key, Some(names[i].as_str()), Some("image/png"), &png));
        }

        let response = app.oneshot(post_report(multipart_body(&parts))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn repeated_files_parts_use_filename_stem_as_key() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));

        let png = tiny_png();
        let mut parts = form_fields("55", "sell", "rejected");
        let names: Vec<String> = schema_for(TransactionCategory::Sell)
            .iter()
            .map(|(key, _)| format!("{key}.png"))
            .collect();
        for name in &names {
            parts.push(("files", Some(name.as_str()), Some("image/png"), &png));
        }

        let response = app.oneshot(post_report(multipart_body(&parts))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn download_unknown_artifact_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download-file/?path=Informe_none.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_order_number_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router(test_state(tmp.path()));

        let body = multipart_body(&[("transaction_type", None, None, b"buy" as &[u8])]);
        let response = app.oneshot(post_report(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_falls_back_to_magic_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let app = router(state.clone());

        let png = tiny_png();
        let mut parts = form_fields("77", "buy", "approved");
        let names: Vec<String> = schema_for(TransactionCategory::Buy)
            .iter()
            .map(|(key, _)| format!("{key}.png"))
            .collect();
        for (i, (key, _)) in schema_for(TransactionCategory::Buy).iter().enumerate() {
            // No Content-Type header on the parts at all.
            parts.push((*key, Some(names[i].as_str()), None, &png));
        }

        let response = app.oneshot(post_report(multipart_body(&parts))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Magic-byte detection classified the uploads as PNG, so persisted
        // originals carry the .png extension.
        let workdir = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.file_name().to_string_lossy().starts_with("temp_77_"))
            .expect("working directory");
        assert!(workdir.path().join("Perfil del Usuario.png").exists());
    }
}
