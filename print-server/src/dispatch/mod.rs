//! Printer dispatch
//!
//! Fans one payload out across N heterogeneous printers. Jobs are
//! independent: each resolves its own device, renders at its own width,
//! and reports into its own slot of the result list. One job's failure
//! never stops the rest; the result list preserves input order by index.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info, instrument};

use posr_printer::{DeviceFactory, DriverConfig, EscposOptions, PrintError};
use shared::ReceiptConfig;

use crate::receipt::{BuildError, Document, PrintData, build_document};
use crate::render::PrinterRenderer;

/// One print job: a driver config plus rendering options, tagged with its
/// position in the request
#[derive(Debug, Clone)]
pub struct PrinterJob {
    pub index: usize,
    pub driver: DriverConfig,
    pub escpos: EscposOptions,
}

/// Outcome of one job, reported in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    pub index: usize,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchResult {
    fn ok(index: usize) -> Self {
        Self {
            index,
            ok: true,
            error: None,
        }
    }

    fn fail(index: usize, error: String) -> Self {
        Self {
            index,
            ok: false,
            error: Some(error),
        }
    }
}

/// Per-job error taxonomy
///
/// Captured into `DispatchResult.error`, never thrown to the HTTP caller.
/// Document construction errors ([`BuildError`]) are stringified into
/// every affected job's result before the jobs run.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Driver resolution failed (missing field, unknown type, no backend)
    #[error(transparent)]
    Driver(#[from] PrintError),

    #[error("device open failure: {0}")]
    DeviceOpenFailure(String),

    #[error("device close failure: {0}")]
    DeviceCloseFailure(String),

    #[error("render failure: {0}")]
    RenderFailure(String),
}

/// Dispatches documents to physical printers
pub struct PrinterDispatcher {
    factory: Arc<dyn DeviceFactory>,
    default_width: usize,
}

impl PrinterDispatcher {
    pub fn new(factory: Arc<dyn DeviceFactory>, default_width: usize) -> Self {
        Self {
            factory,
            default_width,
        }
    }

    /// Dispatch one payload to every printer in the list
    ///
    /// The document is built once; each job renders it at its own paper
    /// width and drives its own device. Jobs run concurrently, results
    /// come back in input-index order.
    #[instrument(skip_all, fields(jobs = jobs.len()))]
    pub async fn dispatch(
        &self,
        jobs: &[PrinterJob],
        data: &PrintData,
        config: &ReceiptConfig,
    ) -> Vec<DispatchResult> {
        let document: Result<Document, String> =
            build_document(data, config).map_err(|e: BuildError| e.to_string());

        let futures = jobs.iter().map(|job| {
            let document = &document;
            async move {
                match document {
                    Err(message) => {
                        error!(index = job.index, error = %message, "document build failed");
                        DispatchResult::fail(job.index, message.clone())
                    }
                    Ok(doc) => match self.run_job(job, doc, config).await {
                        Ok(()) => DispatchResult::ok(job.index),
                        Err(e) => {
                            error!(index = job.index, error = %e, "print job failed");
                            DispatchResult::fail(job.index, e.to_string())
                        }
                    },
                }
            }
        });

        join_all(futures).await
    }

    /// Run one job against its device: resolve, open, render, write, close
    async fn run_job(
        &self,
        job: &PrinterJob,
        document: &Document,
        config: &ReceiptConfig,
    ) -> Result<(), DispatchError> {
        let mut device = self.factory.create(&job.driver)?;

        device
            .open()
            .await
            .map_err(|e| DispatchError::DeviceOpenFailure(e.to_string()))?;

        let renderer = PrinterRenderer::new(config, &job.escpos, self.default_width);
        let bytes = renderer.render(document);

        let write_result = device
            .write(&bytes)
            .await
            .map_err(|e| DispatchError::RenderFailure(e.to_string()));

        // Close regardless of the write outcome; a close failure only
        // surfaces when the write itself succeeded.
        let close_result = device
            .close()
            .await
            .map_err(|e| DispatchError::DeviceCloseFailure(e.to_string()));

        write_result?;
        close_result?;

        info!(index = job.index, bytes = bytes.len(), "print job sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use posr_printer::{Device, PrintResult};
    use serde_json::json;
    use std::sync::Mutex;

    /// Test double device: scripted failures, records written bytes
    #[derive(Debug)]
    struct MockDevice {
        fail_open: bool,
        fail_close: bool,
        written: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    #[async_trait]
    impl Device for MockDevice {
        async fn open(&mut self) -> PrintResult<()> {
            if self.fail_open {
                Err(PrintError::Connection("mock refused to open".to_string()))
            } else {
                Ok(())
            }
        }

        async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            self.written.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn close(&mut self) -> PrintResult<()> {
            if self.fail_close {
                Err(PrintError::Connection("mock refused to close".to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// Factory scripted by the `ip` field: "fail-open" and "fail-close"
    /// produce misbehaving devices, "missing" produces a resolution error
    struct MockFactory {
        written: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl DeviceFactory for MockFactory {
        fn create(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>> {
            match config.ip.as_deref() {
                Some("unresolvable") => Err(PrintError::DriverUnavailable(
                    "mock transport not linked".to_string(),
                )),
                ip => Ok(Box::new(MockDevice {
                    fail_open: ip == Some("fail-open"),
                    fail_close: ip == Some("fail-close"),
                    written: self.written.clone(),
                })),
            }
        }
    }

    fn jobs(ips: &[&str]) -> Vec<PrinterJob> {
        ips.iter()
            .enumerate()
            .map(|(index, ip)| PrinterJob {
                index,
                driver: serde_json::from_value(json!({"type": "network", "ip": ip})).unwrap(),
                escpos: EscposOptions::default(),
            })
            .collect()
    }

    fn final_bill_data() -> PrintData {
        serde_json::from_value(json!({
            "printType": "final",
            "order": {
                "invoice_number": "1042",
                "items": [{"name": "Karahi", "price": 234, "quantity": 2}],
                "payments": [{"amount": 500}],
                "created_at": 1722960000000i64
            }
        }))
        .unwrap()
    }

    fn dispatcher(written: Arc<Mutex<Vec<Vec<u8>>>>) -> PrinterDispatcher {
        PrinterDispatcher::new(Arc::new(MockFactory { written }), 48)
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(written.clone());

        let results = dispatcher
            .dispatch(
                &jobs(&["10.0.0.1", "fail-open", "10.0.0.3"]),
                &final_bill_data(),
                &ReceiptConfig::default(),
            )
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], DispatchResult::ok(0));
        assert!(!results[1].ok);
        assert_eq!(results[1].index, 1);
        assert!(
            results[1]
                .error
                .as_deref()
                .unwrap()
                .contains("device open failure")
        );
        assert_eq!(results[2], DispatchResult::ok(2));

        // the two healthy devices each received the rendered bytes
        assert_eq!(written.lock().unwrap().len(), 2);
        assert!(!results.iter().all(|r| r.ok));
    }

    #[tokio::test]
    async fn test_driver_resolution_error_captured() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(written);

        let results = dispatcher
            .dispatch(
                &jobs(&["unresolvable"]),
                &final_bill_data(),
                &ReceiptConfig::default(),
            )
            .await;

        assert!(!results[0].ok);
        assert!(
            results[0]
                .error
                .as_deref()
                .unwrap()
                .contains("driver unavailable")
        );
    }

    #[tokio::test]
    async fn test_close_failure_reported_after_successful_write() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(written.clone());

        let results = dispatcher
            .dispatch(
                &jobs(&["fail-close"]),
                &final_bill_data(),
                &ReceiptConfig::default(),
            )
            .await;

        assert!(!results[0].ok);
        assert!(
            results[0]
                .error
                .as_deref()
                .unwrap()
                .contains("device close failure")
        );
        // the write itself happened
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_print_type_fails_every_job() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(written.clone());

        let data: PrintData =
            serde_json::from_value(json!({"printType": "poster"})).unwrap();
        let results = dispatcher
            .dispatch(&jobs(&["10.0.0.1", "10.0.0.2"]), &data, &ReceiptConfig::default())
            .await;

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(!result.ok);
            assert!(
                result
                    .error
                    .as_deref()
                    .unwrap()
                    .contains("unknown print type: poster")
            );
        }
        // no device was written to for a doomed request
        assert!(written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_per_job_width_rendering() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = dispatcher(written.clone());

        let mut narrow_and_wide = jobs(&["10.0.0.1", "10.0.0.2"]);
        narrow_and_wide[0].escpos.width = Some(32);

        let results = dispatcher
            .dispatch(&narrow_and_wide, &final_bill_data(), &ReceiptConfig::default())
            .await;
        assert!(results.iter().all(|r| r.ok));

        // completion order is not guaranteed, so match by content
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 2);
        let texts: Vec<String> = written
            .iter()
            .map(|b| String::from_utf8_lossy(b).to_string())
            .collect();
        assert!(
            texts
                .iter()
                .any(|t| t.contains(&"-".repeat(32)) && !t.contains(&"-".repeat(48)))
        );
        assert!(texts.iter().any(|t| t.contains(&"-".repeat(48))));
    }
}
