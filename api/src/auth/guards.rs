use crate::auth::claims::{AuthUser, UserType};
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Validates the bearer token and stores the user in the request extensions.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_user_type(
    req: Request<Body>,
    next: Next,
    required: UserType,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.0.user_type != required {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(format!(
                "Access denied: {} account required",
                required.as_str()
            ))),
        ));
    }

    Ok(next.run(req).await)
}

/// Teacher-only guard.
pub async fn allow_teacher(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_user_type(req, next, UserType::Teacher).await
}

/// Student-only guard.
pub async fn allow_student(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_user_type(req, next, UserType::Student).await
}
