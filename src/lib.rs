/*!
# BRD Dashboard

Reporting core for the EMB-AI BRD (Business Requirements Document) dashboard.

## Overview

Every generated BRD is recorded as a row in a spreadsheet-backed record store, together
with per-format download counters, and its content is stored in a second sheet split
into four parts. This crate turns those two sheets into everything the dashboard
displays: filtered views, headline metrics, a generation trend, download breakdowns,
a top-clients ranking, a searchable BRD list with CSV/XLSX export, and a content
lookup.

## Architecture

### Data Layer
- **Record Store** - external; reached through the `SheetSource` trait
- **Cache** - `CachedSource` keeps fetched sheets for a time-to-live (default one hour)
- **Schema Loader** - validates headers once and converts rows into typed records

### Core Pipeline
- **Filter Engine** - client selection plus inclusive date range
- **Aggregator** - summary metrics, trend series, download breakdown, top clients
- **Report Assembler** - renamed-column table, search, content lookup, exports

### Web Layer (`web` feature)
- **axum** JSON API serving the assembled view and downloads to a front end

## Modules

- **record**: `Submission` and `ContentRecord`
- **sheet**: raw tables, expected columns and typed loading
- **source**: `SheetSource`, CSV directory and in-memory sources, TTL cache
- **filter**: `FilterCriteria` and the filter engine
- **aggregate**: metric, trend, breakdown and ranking computations
- **report**: display table, search and content lookup
- **downloader**: CSV and XLSX export
- **dashboard**: composes a full render, including user-facing notices
- **config**: configuration file and environment overrides
- **error**: `DashboardError`
- **app**: routing and handlers (web feature)
*/

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod downloader;
pub mod error;
pub mod filter;
pub mod record;
pub mod report;
pub mod sheet;
pub mod source;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the everyday types to make them easier to use
pub use aggregate::*;
pub use dashboard::*;
pub use error::{DashboardError, Result};
pub use filter::*;
pub use record::*;
pub use report::*;
pub use source::*;
