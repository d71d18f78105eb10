pub mod error;
pub mod models;
pub mod resolvers;
pub mod schema;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{rejection::GraphQLRejection, GraphQLRequest, GraphQLResponse};
use async_trait::async_trait;
use axum::{
    extract::State,
    response::Html,
    routing::post,
    Router,
};
use bookshelf_http::error::AppError;
use bookshelf_kernel::{
    settings::{BooksSettings, GraphQlSettings, Settings},
    InitCtx, Module,
};
use serde_json::json;

use schema::{build_schema, BookSchema};
use store::BookStore;

/// Serves the book catalogue over GraphQL
pub struct BooksModule {
    schema: BookSchema,
    endpoint: String,
    playground: bool,
    book_count: usize,
}

impl BooksModule {
    pub fn new(store: BookStore, settings: &GraphQlSettings) -> Self {
        Self {
            book_count: store.len(),
            schema: build_schema(store, settings),
            endpoint: settings.path.clone(),
            playground: settings.playground,
        }
    }

    /// The executable schema behind the HTTP endpoint
    pub fn schema(&self) -> &BookSchema {
        &self.schema
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn base_path(&self) -> String {
        self.endpoint.clone()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = self.book_count,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let mut endpoint = post(graphql_handler);
        if self.playground {
            let page = GraphiQLSource::build().endpoint(&self.endpoint).finish();
            endpoint = endpoint.get(move || async move { Html(page.clone()) });
        }

        Router::new()
            .route("/", endpoint)
            .with_state(self.schema.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let mut operations = json!({
            "post": {
                "summary": "Execute a GraphQL query",
                "tags": ["Books"],
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/GraphQLRequest" }
                        }
                    }
                },
                "responses": {
                    "200": {
                        "description": "GraphQL response; field errors are reported in `errors`",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/GraphQLResponse" }
                            }
                        }
                    },
                    "400": {
                        "description": "Malformed GraphQL request body",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                            }
                        }
                    }
                }
            }
        });

        if self.playground {
            operations["get"] = json!({
                "summary": "GraphiQL explorer",
                "tags": ["Books"],
                "responses": {
                    "200": {
                        "description": "GraphiQL page",
                        "content": {
                            "text/html": { "schema": { "type": "string" } }
                        }
                    }
                }
            });
        }

        Some(json!({
            "paths": { "/": operations },
            "components": {
                "schemas": {
                    "GraphQLRequest": {
                        "type": "object",
                        "properties": {
                            "query": { "type": "string" },
                            "operationName": { "type": "string" },
                            "variables": { "type": "object" }
                        },
                        "required": ["query"]
                    },
                    "GraphQLResponse": {
                        "type": "object",
                        "properties": {
                            "data": { "type": "object" },
                            "errors": { "type": "array", "items": { "type": "object" } }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), endpoint = %self.endpoint, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

async fn graphql_handler(
    State(schema): State<BookSchema>,
    request: Result<GraphQLRequest, GraphQLRejection>,
) -> Result<GraphQLResponse, AppError> {
    let request = request.map_err(|rejection| {
        AppError::bad_request(
            vec![json!({ "field": "body", "error": rejection.0.to_string() })],
            "invalid GraphQL request",
        )
    })?;

    Ok(schema.execute(request.into_inner()).await.into())
}

/// Build the catalogue named by `settings`, or the built-in one.
pub fn load_store(settings: &BooksSettings) -> anyhow::Result<BookStore> {
    match &settings.data_path {
        Some(path) => {
            let store = BookStore::from_json_file(path)
                .with_context(|| format!("failed to load books from {}", path.display()))?;
            tracing::info!(path = %path.display(), books = store.len(), "loaded book catalogue");
            Ok(store)
        }
        None => Ok(BookStore::seeded()),
    }
}

/// Create a new instance of the books module
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    let store = load_store(&settings.books)?;
    Ok(Arc::new(BooksModule::new(store, &settings.graphql)))
}
