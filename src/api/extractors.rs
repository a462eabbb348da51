use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use crate::api::errors::APIErrors;
use crate::api::state::AppState;
use crate::data::repos::traits::store::Store;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::TypedHeader;
use crate::security::jwt::AccessClaims;

impl<S: Store> FromRequestParts<AppState<S>> for AccessClaims {
    type Rejection = APIErrors;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                tracing::warn!("Missing or malformed authorization header");
                APIErrors::Unauthorized
            })?;

        let claims = state.jwt.decode_token::<AccessClaims>(bearer.token())?;

        Ok(claims)
    }
}

/// JSON body whose rejections (bad syntax, missing or mistyped fields, wrong
/// content type) are answered as `400` with a `{"message"}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = APIErrors;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                Err(APIErrors::BadRequest(rejection_message(&rejection)))
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(e) => format!("Invalid request body: {}", e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected a JSON body with Content-Type: application/json".to_string()
        }
        _ => "The request body is not valid JSON".to_string(),
    }
}
