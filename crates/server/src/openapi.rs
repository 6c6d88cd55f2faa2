use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub availability: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreateProductInputDoc {
    pub name: String,
    pub price: f64,
    pub availability: Option<bool>,
}

#[derive(ToSchema)]
pub struct ReplaceProductInputDoc {
    pub name: String,
    pub price: f64,
    pub availability: bool,
}

#[derive(ToSchema)]
pub struct ProductResponse { pub data: ProductDoc }

#[derive(ToSchema)]
pub struct ProductListResponse { pub data: Vec<ProductDoc> }

#[derive(ToSchema)]
pub struct DeletedResponse { pub data: String }

/// One failed rule. `value` echoes the offending input as sent (any JSON
/// value) and is omitted when the field was absent.
#[derive(ToSchema)]
pub struct FieldErrorDoc {
    #[schema(rename = "type", example = "field")]
    pub kind: String,
    pub value: Option<serde_json::Value>,
    pub msg: String,
    pub path: Option<String>,
    pub location: String,
}

#[derive(ToSchema)]
pub struct ValidationErrorResponse { pub errors: Vec<FieldErrorDoc> }

#[derive(ToSchema)]
pub struct NotFoundResponse { pub error: String }

#[derive(OpenApi)]
#[openapi(
    info(title = "Products REST API", description = "CRUD over the product catalogue"),
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::create,
        crate::routes::products::get,
        crate::routes::products::replace,
        crate::routes::products::toggle_availability,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            CreateProductInputDoc,
            ReplaceProductInputDoc,
            ProductResponse,
            ProductListResponse,
            DeletedResponse,
            FieldErrorDoc,
            ValidationErrorResponse,
            NotFoundResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;
