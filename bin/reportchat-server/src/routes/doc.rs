use axum::Json;
use utoipa::OpenApi;

use crate::routes::{api, health};

#[derive(OpenApi)]
#[openapi(info(
    title = "reportchat-server",
    description = "JSON endpoints of the report chat server. The pages themselves are HTML forms and are not described here."
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(api::SessionApi::openapi());
    root
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(get_docs())
}
