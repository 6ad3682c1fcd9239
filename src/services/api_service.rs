use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer, Result as ActixResult};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::devices::control::{CommandSink, ControlAction, ControlCommand, ControlDevice};
use crate::devices::gps::GpsService;
use crate::utils::error::BridgeError;

// Control request payload. Both fields are optional at the serde level so a
// missing field gets its own error message instead of a generic 400.
#[derive(Debug, Deserialize, Serialize)]
pub struct ControlRequest {
    pub device: Option<String>,
    pub action: Option<String>,
}

// API Service state shared with every handler
#[derive(Clone)]
pub struct ApiServiceState {
    pub gps: GpsService,
    pub control: Arc<dyn CommandSink>,
    pub surface_send_errors: bool,
}

impl ApiServiceState {
    pub fn new(gps: GpsService, control: Arc<dyn CommandSink>, surface_send_errors: bool) -> Self {
        Self {
            gps,
            control,
            surface_send_errors,
        }
    }
}

// API Service
pub struct ApiService {
    state: ApiServiceState,
    server_handle: Option<actix_web::dev::ServerHandle>,
}

impl ApiService {
    pub fn new(state: ApiServiceState) -> Self {
        Self {
            state,
            server_handle: None,
        }
    }

    pub async fn start(&mut self, port: u16) -> Result<(), BridgeError> {
        info!("🌐 Starting HTTP API server on port {}", port);

        let state_data = web::Data::new(self.state.clone());

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state_data.clone())
                .wrap(Logger::default())
                .configure(configure_routes)
        })
        .bind(format!("0.0.0.0:{}", port))?
        .run();

        // Keep the handle for graceful shutdown
        self.server_handle = Some(server.handle());

        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("❌ HTTP API server error: {}", e);
            }
        });

        info!("✅ HTTP API server started successfully on port {}", port);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), BridgeError> {
        info!("🛑 Stopping HTTP API server...");

        if let Some(handle) = self.server_handle.take() {
            tokio::select! {
                _ = handle.stop(true) => {
                    info!("✅ HTTP API server stopped gracefully");
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(10)) => {
                    warn!("⚠️  HTTP API server shutdown timeout, forcing stop");
                    handle.stop(false).await;
                }
            }
        }

        Ok(())
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/gps", web::get().to(get_gps))
            .route("/control", web::post().to(post_control)),
    );
}

// API Endpoints

// GET /api/gps - latest parsed fix, 404 until the first one arrives
async fn get_gps(state: web::Data<ApiServiceState>) -> ActixResult<HttpResponse> {
    match state.gps.latest_fix().await {
        Some(fix) => Ok(HttpResponse::Ok().json(fix)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No GPS data received yet"
        }))),
    }
}

// POST /api/control - validate, forward to the command channel, acknowledge
async fn post_control(
    request: web::Json<ControlRequest>,
    state: web::Data<ApiServiceState>,
) -> ActixResult<HttpResponse> {
    let command = match validate_control_request(&request) {
        Ok(command) => command,
        Err(message) => {
            warn!("❌ Control validation failed: {}", message);
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": message
            })));
        }
    };

    match state.control.send(&command).await {
        Ok(()) => {
            info!("✅ Control command {} delivered", command);
        }
        Err(e) => {
            // Fire-and-forget by default: the failure stays in the logs and
            // the acknowledgement below still goes out, unless the
            // deployment opted into surfacing it.
            error!("❌ Failed to deliver control command {}: {}", command, e);
            if state.surface_send_errors {
                return Ok(HttpResponse::BadGateway().json(serde_json::json!({
                    "message": format!("Failed to send command to {}", command.device)
                })));
            }
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Command sent to {}: {}", command.device, command.action)
    })))
}

// GET /api/health - service liveness and ingest status
async fn health_check(state: web::Data<ApiServiceState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "Locator Bridge API",
        "version": crate::VERSION,
        "gps_running": state.gps.is_running().await,
        "last_fix_at": state.gps.last_fix_at().await,
    })))
}

// Helper to turn the raw request into a validated command
pub fn validate_control_request(request: &ControlRequest) -> Result<ControlCommand, String> {
    let (device, action) = match (&request.device, &request.action) {
        (Some(device), Some(action)) => (device, action),
        _ => return Err("Device and action are required".to_string()),
    };

    match (ControlDevice::parse(device), ControlAction::parse(action)) {
        (Some(device), Some(action)) => Ok(ControlCommand::new(device, action)),
        _ => Err("Invalid device or action".to_string()),
    }
}
