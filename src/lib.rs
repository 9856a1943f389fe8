//! # Shoebox
//!
//! A content-addressed image archive with tag-based retrieval.
//!
//! Shoebox watches a consume directory for image files, hashes them
//! concurrently, archives each distinct content exactly once under a
//! digest-derived name, and records everything in a relational tag/image
//! index served via a CLI and a small JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌───────────┐
//! │  Consume    │──▶│  Hash Pool    │──▶│  Archive   │
//! │  dir scan   │   │ (N workers)  │   │ <hex><ext> │
//! └─────────────┘   └──────────────┘   └─────┬─────┘
//!                                            │
//!                                      ┌─────▼─────┐
//!                                      │  SQLite    │
//!                                      │ image/tag  │
//!                                      └─────┬─────┘
//!                             ┌──────────────┤
//!                             ▼              ▼
//!                        ┌──────────┐  ┌──────────┐
//!                        │   CLI    │  │   HTTP   │
//!                        │  (sbx)   │  │  (JSON)  │
//!                        └──────────┘  └──────────┘
//! ```
//!
//! Data flows one way during ingestion: scan → hash → archive → index.
//! Queries flow the reverse direction: index read → archive read → bytes
//! back to the caller.
//!
//! ## Quick Start
//!
//! ```bash
//! sbx init                 # create database
//! sbx ingest               # hash + archive the consume directory
//! sbx images               # list archived images
//! sbx tag 1 cat            # attach a tag
//! sbx search cat           # find images by tag
//! sbx serve                # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`scan`] | Consume-directory enumeration |
//! | [`hash`] | Streaming SHA-256 digests |
//! | [`pool`] | Concurrent hash worker pool |
//! | [`store`] | Content-addressed archive |
//! | [`index`] | Relational tag/image index |
//! | [`ingest`] | Ingestion orchestration |
//! | [`search`] | Tag search and listing |
//! | [`show`] | Image detail retrieval |
//! | [`tag`] | Tag attachment |
//! | [`server`] | JSON HTTP boundary |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod error;
pub mod hash;
pub mod index;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod scan;
pub mod search;
pub mod server;
pub mod show;
pub mod store;
pub mod tag;
