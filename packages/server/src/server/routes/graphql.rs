use crate::common::AppError;
use crate::server::graphql::{GraphQLContext, Schema};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::{graphiql::graphiql_source, GraphQLBatchRequest, GraphQLRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

const MAX_BATCH_SIZE: usize = 20;

/// Field errors answer 200 with an `errors` array. Only a request that
/// fails as a whole (parse or validation) gets 400.
fn respond<T: Serialize>(ok: bool, body: T) -> Response {
    let status = if ok { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    (status, Json(body)).into_response()
}

/// POST /graphql
pub async fn graphql_handler(
    Extension(schema): Extension<Arc<Schema>>,
    Extension(context): Extension<GraphQLContext>,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    debug!(
        operation = request.operation_name().unwrap_or("anonymous"),
        authenticated = context.auth_user.is_some(),
        "GraphQL request"
    );
    let response = request.execute(&schema, &context).await;
    respond(response.is_ok(), response)
}

/// POST /graphql/batch
pub async fn graphql_batch_handler(
    Extension(schema): Extension<Arc<Schema>>,
    Extension(context): Extension<GraphQLContext>,
    Json(batch): Json<GraphQLBatchRequest>,
) -> Response {
    if let GraphQLBatchRequest::Batch(requests) = &batch {
        if requests.len() > MAX_BATCH_SIZE {
            return AppError::validation(format!(
                "Batch exceeds {} operations",
                MAX_BATCH_SIZE
            ))
            .into_response();
        }
    }

    let response = batch.execute(&schema, &context).await;
    respond(response.is_ok(), response)
}

/// GET /graphql (debug builds): GraphiQL pointed at this server.
pub async fn graphql_playground() -> Html<String> {
    Html(graphiql_source("/graphql", None))
}
