use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Multipart form: one or more `files` parts.
#[derive(ToSchema)]
pub struct UploadFormDoc {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentViewDoc {
    pub id: String,
    pub name: String,
    pub original_name: String,
    pub upload_date: String,
    pub size: u64,
    pub size_formatted: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub path: String,
}

#[derive(ToSchema)]
pub struct LinkInputDoc {
    /// Required for updates only.
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    /// Defaults to `Other`.
    pub category: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecordDoc {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub added_date: String,
    pub category: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::documents::list,
        crate::routes::documents::upload,
        crate::routes::documents::delete,
        crate::routes::links::list,
        crate::routes::links::create,
        crate::routes::links::update,
        crate::routes::links::delete,
    ),
    components(
        schemas(
            HealthResponse,
            UploadFormDoc,
            DocumentViewDoc,
            LinkInputDoc,
            LinkRecordDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "documents", description = "Uploaded files and their metadata index"),
        (name = "links", description = "Bookmark registry"),
    )
)]
pub struct ApiDoc;
