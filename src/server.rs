//! HTTP surface: `POST /process` and `GET /health` on actix-web.
//!
//! Handlers hold no state besides the immutable [`Limits`]; each request is
//! decoded, validated, computed on the blocking pool and answered
//! independently.

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, web};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::dsp::processor::{MAX_SAMPLE_COUNT, process};
use crate::error::ProcessError;
use crate::wire::{ErrorBody, ProcessParams, SignalData};

/// Per-request limits shared by all workers. `max_samples` only ever narrows
/// the library's own [`MAX_SAMPLE_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_samples: usize,
}

impl From<&ServerConfig> for Limits {
    fn from(config: &ServerConfig) -> Self {
        Limits {
            max_samples: config.max_samples.min(MAX_SAMPLE_COUNT),
        }
    }
}

/// Error returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("computation failed: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Process(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Process(err) => ErrorBody::from(err),
            ApiError::Internal(msg) => ErrorBody::new("internal", msg.clone()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

async fn process_signal(
    params: web::Json<ProcessParams>,
    limits: web::Data<Limits>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    let request = params.to_request().inspect_err(|err| {
        tracing::info!(error = %err, "rejected process request");
    })?;

    if request.sample_count > limits.max_samples {
        let err = ProcessError::invalid_parameter(
            "samples",
            format!(
                "must not exceed {}, got {}",
                limits.max_samples, request.sample_count
            ),
        );
        tracing::info!(error = %err, "rejected process request");
        return Err(err.into());
    }

    let result = web::block(move || process(&request))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "blocking pool failed");
            ApiError::Internal(err.to_string())
        })?
        .inspect_err(|err| {
            tracing::info!(error = %err, "rejected process request");
        })?;

    tracing::debug!(
        operation = %request.operation,
        samples = request.sample_count,
        fs = request.sample_rate,
        rms = result.stats.rms,
        "processed"
    );
    Ok(HttpResponse::Ok().json(SignalData::from(result)))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// JSON extractor config: malformed bodies get an [`ErrorBody`] rather than
/// actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::info!(error = %err, "malformed process request");
        let body = ErrorBody::new("malformed_request", err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

/// Register routes and shared data. Use with `App::configure`.
pub fn configure(limits: Limits) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(limits))
            .app_data(json_config())
            .route("/process", web::post().to(process_signal))
            .route("/health", web::get().to(health));
    }
}

/// Bind according to `config` and serve until shutdown.
pub async fn run(config: &ServerConfig) -> std::io::Result<()> {
    let limits = Limits::from(config);
    let (host, port) = config.bind_address();

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .configure(configure(limits))
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }
    let server = server.bind((host.as_str(), port))?;

    for addr in server.addrs() {
        tracing::info!(%addr, "listening; endpoint POST /process");
    }
    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    fn params(operation: &str, samples: i64) -> ProcessParams {
        ProcessParams {
            a1: 1.0,
            f1: 5.0,
            phi1: 0.0,
            a2: 1.0,
            f2: 10.0,
            phi2: 0.0,
            operation: operation.to_string(),
            samples,
            fs: 1000.0,
        }
    }

    macro_rules! app {
        ($max:expr) => {
            test::init_service(
                App::new()
                    .wrap(Cors::permissive())
                    .configure(configure(Limits { max_samples: $max })),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn process_returns_full_result() {
        let app = app!(10_000);
        let req = test::TestRequest::post()
            .uri("/process")
            .set_json(params("add", 4))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let data: SignalData = test::read_body_json(resp).await;
        assert_eq!(data.t, vec![0.0, 0.001, 0.002, 0.003]);
        assert!(data.is_consistent());
        assert_eq!(data.y[0], 0.0);
        for i in 0..data.len() {
            assert!((data.y[i] - (data.x1[i] + data.x2[i])).abs() < 1e-12);
        }
    }

    #[actix_web::test]
    async fn unknown_operation_is_400() {
        let app = app!(10_000);
        let req = test::TestRequest::post()
            .uri("/process")
            .set_json(params("divide", 4))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "invalid_operation");
        assert_eq!(body.field.as_deref(), Some("operation"));
    }

    #[actix_web::test]
    async fn zero_samples_is_400() {
        let app = app!(10_000);
        let req = test::TestRequest::post()
            .uri("/process")
            .set_json(params("add", 0))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "invalid_parameter");
        assert_eq!(body.field.as_deref(), Some("samples"));
    }

    #[actix_web::test]
    async fn sample_limit_enforced() {
        let app = app!(100);
        let req = test::TestRequest::post()
            .uri("/process")
            .set_json(params("multiply", 101))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert!(body.message.contains("must not exceed 100"));
    }

    #[actix_web::test]
    async fn out_of_range_synthesis_is_400_not_null() {
        let app = app!(10_000);

        let mut product = params("multiply", 64);
        product.a1 = 1e200;
        product.a2 = 1e200;
        let mut tiny_rate = params("add", 4);
        tiny_rate.fs = 1e-320;

        for (p, field) in [(product, "a1"), (tiny_rate, "fs")] {
            let req = test::TestRequest::post()
                .uri("/process")
                .set_json(p)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: ErrorBody = test::read_body_json(resp).await;
            assert_eq!(body.field.as_deref(), Some(field));
        }
    }

    #[actix_web::test]
    async fn malformed_json_is_400_with_body() {
        let app = app!(100);
        let req = test::TestRequest::post()
            .uri("/process")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"a1": 1.0, "operation": "add"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "malformed_request");
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(100);
        let req = test::TestRequest::get().uri("/health").to_request();
        let health: Health = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, crate::VERSION);
    }

    #[actix_web::test]
    async fn limits_from_config() {
        let config = ServerConfig {
            max_samples: 42,
            ..Default::default()
        };
        assert_eq!(Limits::from(&config).max_samples, 42);

        let config = ServerConfig {
            max_samples: usize::MAX,
            ..Default::default()
        };
        assert_eq!(Limits::from(&config).max_samples, MAX_SAMPLE_COUNT);
    }
}
