pub mod models;
pub mod repo;
pub mod routes;
pub mod schema;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_kernel::{InitCtx, Migration, Module};

use self::repo::BookRepository;

/// The book catalog module: routes, schema validation, and storage for the
/// single `books` resource.
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        let repo = BookRepository::new(ctx.db.pool().clone());

        Router::new()
            .route("/", get(routes::list_books).post(routes::create_book))
            .route(
                "/{isbn}",
                get(routes::get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
            .with_state(repo)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books ordered by title",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "books": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/Book" }
                                                }
                                            },
                                            "required": ["books"]
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ValidationErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "Duplicate isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Fetch a book by isbn",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Overwrite a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ValidationErrorResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "message": { "type": "string" }
                                            },
                                            "required": ["message"]
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": {
                                "type": "string",
                                "description": "International Standard Book Number; primary key"
                            },
                            "amazon_url": { "type": "string", "format": "uri" },
                            "author": { "type": "string" },
                            "language": { "type": "string" },
                            "pages": { "type": "integer" },
                            "publisher": { "type": "string" },
                            "title": { "type": "string" },
                            "year": { "type": "integer" }
                        },
                        "required": [
                            "isbn", "amazon_url", "author", "language",
                            "pages", "publisher", "title", "year"
                        ]
                    },
                    "BookEnvelope": {
                        "type": "object",
                        "properties": {
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["book"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: "CREATE TABLE IF NOT EXISTS books (
                     isbn       TEXT PRIMARY KEY,
                     amazon_url TEXT NOT NULL,
                     author     TEXT NOT NULL,
                     language   TEXT NOT NULL,
                     pages      INTEGER NOT NULL,
                     publisher  TEXT NOT NULL,
                     title      TEXT NOT NULL,
                     year       INTEGER NOT NULL
                 )",
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
