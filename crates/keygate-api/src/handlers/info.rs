//! Self-describing endpoints for mod-menu integrators.

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

const EXAMPLE: &str = "curl -X POST /connect -d 'game=PUBG&user_key=Deneme&serial=hwid123'";

/// GET /api/status
pub async fn api_status() -> Json<Value> {
    Json(json!({
        "status": true,
        "message": "Mod menu API is running",
        "endpoints": {
            "connect": {
                "url": "/connect or /api/connect",
                "method": "POST",
                "format": "application/x-www-form-urlencoded",
                "parameters": "game=PUBG&user_key={key_name}&serial={hwid}"
            },
            "disconnect": {
                "url": "/disconnect or /api/disconnect",
                "method": "POST",
                "format": "application/x-www-form-urlencoded",
                "parameters": "user_key={key_name}&serial={hwid}"
            }
        },
        "example": EXAMPLE,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /connect
pub async fn connect_usage() -> Json<Value> {
    Json(json!({
        "status": true,
        "message": "Mod menu connect endpoint is running",
        "info": "This endpoint accepts POST requests.",
        "usage": {
            "method": "POST",
            "contentType": "application/x-www-form-urlencoded",
            "parameters": {
                "game": "PUBG",
                "user_key": "key name or key",
                "serial": "hwid"
            }
        },
        "example": EXAMPLE,
    }))
}
