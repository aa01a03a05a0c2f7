//! GraphQL transport: `/graphql` for queries and mutations plus the GraphiQL
//! IDE, `/graphql/ws` for subscriptions.

use async_graphql::Data;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;

use crate::app::AppState;
use crate::graphql::context;

pub const GRAPHQL_PATH: &str = "/graphql";
pub const GRAPHQL_WS_PATH: &str = "/graphql/ws";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
        .route(GRAPHQL_WS_PATH, get(graphql_ws_handler))
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(
            GraphiQLSource::build()
                .endpoint(GRAPHQL_PATH)
                .subscription_endpoint(GRAPHQL_WS_PATH)
                .finish(),
        )
        .into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let current_user = context::from_headers(&state.auth, &headers).await;
    let request = req.into_inner().data(current_user);

    state.schema.execute(request).await.into()
}

/// GraphQL WebSocket handler for subscriptions.
///
/// The user comes from the upgrade request headers, or from an
/// `Authorization` entry in the `connection_init` payload when present.
async fn graphql_ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let header_user = context::from_headers(&state.auth, &headers).await;

    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let auth = state.auth.clone();
            GraphQLWebSocket::new(socket, state.schema.clone(), protocol)
                .on_connection_init(move |params| async move {
                    let current_user =
                        context::from_connection_init(&auth, &params, header_user).await;
                    let mut data = Data::default();
                    data.insert(current_user);
                    Ok(data)
                })
                .serve()
        })
}
