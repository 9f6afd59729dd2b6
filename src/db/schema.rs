//! Database schema and migrations.
//!
//! Migrations are applied in order; the `schema_version` table records which
//! ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: document table shared by every content collection
    r#"
CREATE TABLE documents (
    collection  TEXT NOT NULL,          -- 'ctfs', 'challenges', 'members'
    id          TEXT NOT NULL,
    body        TEXT NOT NULL,          -- JSON document
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE INDEX idx_documents_collection_created ON documents(collection, created_at);
"#,
];
