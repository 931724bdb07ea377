//! Authentication for the resource API.
//!
//! Requests are accepted with either a bearer token issued by the login
//! endpoint or the optional pre-shared key. Credential and key checks use
//! constant-time comparison.

mod session;

pub use session::*;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Everything the auth layer needs to decide on a request.
#[derive(Clone)]
pub struct AuthGate {
    pub sessions: Arc<SessionRegistry>,
    pub api_psk: Option<String>,
    pub required: bool,
}

/// Auth layer function guarding the resource routes.
pub async fn auth_layer(gate: AuthGate, request: Request, next: Next) -> Response {
    // Auth disabled (dev mode)
    if !gate.required {
        return next.run(request).await;
    }

    if is_authorized(&gate, request.headers()).await {
        return next.run(request).await;
    }

    AppError::Unauthorized("Missing or invalid credentials".to_string()).into_response()
}

async fn is_authorized(gate: &AuthGate, headers: &HeaderMap) -> bool {
    if let (Some(expected), Some(provided)) = (gate.api_psk.as_deref(), api_key(headers)) {
        if constant_time_compare(provided, expected) {
            return true;
        }
    }

    match bearer_token(headers) {
        Some(token) => gate.sessions.validate(token).await.is_some(),
        None => false,
    }
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
