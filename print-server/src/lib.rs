//! posr print server
//!
//! Receipt composition and multi-target rendering engine for the posr
//! back office.
//!
//! # Architecture
//!
//! ```text
//! Order(s) + ReceiptConfig
//!     -> BillMapper | SummaryAggregator   (receipt/bill, receipt/summary)
//!     -> Document                          (receipt/document + builders)
//!     -> PrinterRenderer -> Device         (render/escpos, posr-printer)
//!     -> HtmlRenderer    -> markup         (render/html)
//! ```
//!
//! One `Document` is built per request and consumed by both renderers,
//! so the printed receipt and the browser preview always show identical
//! figures. The dispatcher fans the document out across N heterogeneous
//! printers with per-device failure isolation.
//!
//! # Module structure
//!
//! ```text
//! print-server/src/
//! ├── core/       # configuration, state, HTTP server
//! ├── api/        # HTTP routes and handlers
//! ├── receipt/    # bill mapping, summary aggregation, document builders
//! ├── render/     # ESC/POS and HTML renderers
//! ├── dispatch/   # per-printer job execution
//! └── utils/      # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod dispatch;
pub mod receipt;
pub mod render;
pub mod utils;

// Re-export public types
pub use core::{AppState, Config, Server, build_router};
pub use dispatch::{DispatchResult, PrinterDispatcher, PrinterJob};
pub use receipt::{Bill, Document, PrintType, SummaryReport};
pub use render::{HtmlRenderer, PrinterRenderer};
pub use utils::{AppError, AppResult, init_logger};

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _______
   / __ \/ __ \/ ___/ _\
  / /_/ / / / /\__ \/ /
 / ____/ /_/ /___/ / /
/_/    \____//____/_/   print server
    "#
    );
}
