//! OpenAPI response components for the error body, one per status the API returns.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "INVALID_ARGUMENT",
        "message": "Request validation failed",
        "details": {
            "username": [{
                "code": "length",
                "message": "username must be 3-50 characters",
                "params": {"min": 3, "max": 50, "value": "ab"}
            }]
        }
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Missing, invalid or expired credentials",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "INVALID_TOKEN",
        "message": "Invalid or expired token"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Authenticated but not allowed",
    content_type = "application/json",
    example = json!({
        "code": 1003,
        "error": "PERMISSION_DENIED",
        "message": "Only the task creator can delete it"
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Task not found: 0191c2a4-7b1e-7d45-9a0c-6f2b1d3e4f50"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict with an existing resource",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "ALREADY_EXISTS",
        "message": "Username 'alice' is already taken"
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Status change not allowed from the current status",
    content_type = "application/json",
    example = json!({
        "code": 1007,
        "error": "INVALID_TRANSITION",
        "message": "Cannot move task from completed to pending"
    })
)]
pub struct UnprocessableResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1000,
        "error": "INTERNAL_ERROR",
        "message": "An internal error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
