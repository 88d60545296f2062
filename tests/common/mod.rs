// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Common utility functions used across multiple integration test files.
//
// Each test file that imports this module compiles its own copy, so not every
// function is used in every binary. Suppress the resulting dead_code warnings.
#![allow(dead_code)]
// Import this module in each test file with:
//
//     mod common;
//     use common::{ProtoTree, render_diagnostic};

use std::fs;
use std::path::{Path, PathBuf};

use miette::{GraphicalReportHandler, GraphicalTheme};
use tempfile::TempDir;

/// A temporary proto directory. Files are written relative to its root and
/// removed when the tree is dropped.
pub struct ProtoTree {
    dir: TempDir,
}

impl ProtoTree {
    pub fn new() -> Self {
        ProtoTree {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// A small orders API: one service, messages that import a shared money type.
pub const ORDERS_PROTO: &str = r#"syntax = "proto3";

package orders;

import "google/protobuf/timestamp.proto";
import "common/money.proto";

// Manages customer orders.
service OrderService {
  // Fetch a single order.
  rpc GetOrder(GetOrderRequest) returns (Order);
  // List orders for a customer.
  rpc ListOrders(ListOrdersRequest) returns (ListOrdersResponse);
}

message GetOrderRequest {
  // Order id; ord_123
  string id = 1;
}

message ListOrdersRequest {
  string customer_id = 1;
  int32 page_size = 2;
}

message ListOrdersResponse {
  repeated Order orders = 1;
}

// A customer order
message Order {
  string id = 1;
  Status status = 2;
  common.Money total = 3;
  google.protobuf.Timestamp placed_at = 4;
  map<string, string> labels = 5;

  enum Status {
    STATUS_UNSPECIFIED = 0;
    PLACED = 1;
    SHIPPED = 2;
  }
}
"#;

pub const MONEY_PROTO: &str = r#"syntax = "proto3";

package common;

// An amount of money.
message Money {
  // Currency code; AUD
  string currency = 1;
  int64 units = 2;
}
"#;

/// Render a single diagnostic to a deterministic string for assertions.
/// Uses non-unicode theme at 80 columns.
pub fn render_diagnostic(report: &miette::Report) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::none()).with_width(80);
    let mut buf = String::new();
    handler
        .render_report(&mut buf, report.as_ref())
        .expect("render to String is infallible");
    buf
}
