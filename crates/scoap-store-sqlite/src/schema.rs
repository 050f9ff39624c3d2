//! SQL schemas for the SCOAP SQLite stores.
//!
//! Executed once at connection startup; `PRAGMA user_version` records the
//! schema version so future migrations can be gated on it.

/// Relational store DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every child table carries a `position` column so related rows load back
/// in the order they were written.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS articles (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    title             TEXT,
    subtitle          TEXT,
    abstract          TEXT,
    publication_date  TEXT,            -- YYYY-MM-DD or NULL
    created_at        TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    updated_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS article_files (
    article_id  INTEGER NOT NULL REFERENCES articles(id),
    position    INTEGER NOT NULL,
    file        TEXT NOT NULL,
    size        INTEGER,
    filetype    TEXT
);

CREATE TABLE IF NOT EXISTS article_identifiers (
    article_id        INTEGER NOT NULL REFERENCES articles(id),
    position          INTEGER NOT NULL,
    identifier_type   TEXT NOT NULL,   -- 'DOI' | 'arXiv' | ...
    identifier_value  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS arxiv_categories (
    article_id  INTEGER NOT NULL REFERENCES articles(id),
    position    INTEGER NOT NULL,
    category    TEXT NOT NULL,
    is_primary  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS authors (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    article_id  INTEGER NOT NULL REFERENCES articles(id),
    position    INTEGER NOT NULL,
    first_name  TEXT,
    last_name   TEXT,
    full_name   TEXT,
    email       TEXT
);

CREATE TABLE IF NOT EXISTS author_identifiers (
    author_id         INTEGER NOT NULL REFERENCES authors(id),
    position          INTEGER NOT NULL,
    identifier_type   TEXT NOT NULL,   -- 'ORCID' | 'INSPIRE ID' | ...
    identifier_value  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS countries (
    code  TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS affiliations (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id     INTEGER NOT NULL REFERENCES authors(id),
    position      INTEGER NOT NULL,
    value         TEXT,
    organization  TEXT,
    country_code  TEXT REFERENCES countries(code),
    country_name  TEXT               -- name as given for this affiliation
);

CREATE TABLE IF NOT EXISTS institution_identifiers (
    affiliation_id    INTEGER NOT NULL REFERENCES affiliations(id),
    position          INTEGER NOT NULL,
    identifier_type   TEXT NOT NULL,   -- 'ROR' | 'GRID' | ...
    identifier_value  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS publishers (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS publication_info (
    article_id          INTEGER NOT NULL REFERENCES articles(id),
    position            INTEGER NOT NULL,
    publisher_id        INTEGER NOT NULL REFERENCES publishers(id),
    journal_title       TEXT NOT NULL,
    journal_volume      TEXT,
    journal_issue       TEXT,
    journal_issue_date  TEXT,          -- YYYY-MM-DD or NULL
    volume_year         INTEGER,
    page_start          TEXT,
    page_end            TEXT,
    artid               TEXT
);

CREATE TABLE IF NOT EXISTS copyrights (
    article_id  INTEGER NOT NULL REFERENCES articles(id),
    position    INTEGER NOT NULL,
    statement   TEXT,
    holder      TEXT,
    year        INTEGER
);

-- Licenses are shared between articles.
CREATE TABLE IF NOT EXISTS licenses (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    url   TEXT,
    UNIQUE (name, url)
);

CREATE TABLE IF NOT EXISTS article_licenses (
    article_id  INTEGER NOT NULL REFERENCES articles(id),
    position    INTEGER NOT NULL,
    license_id  INTEGER NOT NULL REFERENCES licenses(id)
);

CREATE INDEX IF NOT EXISTS article_files_article_idx       ON article_files(article_id);
CREATE INDEX IF NOT EXISTS article_identifiers_article_idx ON article_identifiers(article_id, identifier_type, identifier_value);
CREATE INDEX IF NOT EXISTS arxiv_categories_article_idx    ON arxiv_categories(article_id);
CREATE INDEX IF NOT EXISTS authors_article_idx             ON authors(article_id);
CREATE INDEX IF NOT EXISTS affiliations_author_idx         ON affiliations(author_id);
CREATE INDEX IF NOT EXISTS publication_info_article_idx    ON publication_info(article_id);

PRAGMA user_version = 1;
";

/// Search-document index DDL.
pub const INDEX_SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS article_documents (
    id          INTEGER PRIMARY KEY,
    body        TEXT NOT NULL,   -- JSON-encoded ArticleDocument
    indexed_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
