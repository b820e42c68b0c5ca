use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use super::FileUpload;
use crate::dataset::{self, Dataset, ParseError};

pub(super) struct ParseJob {
    pub request_id: u64,
    pub upload: FileUpload,
}

/// Completed parse tagged with the request that produced it.
#[derive(Debug)]
pub struct ParseOutcome {
    pub request_id: u64,
    pub file_name: String,
    pub file_size: u64,
    pub result: Result<Dataset, ParseError>,
}

/// Background thread that decodes uploads off the UI thread.
///
/// Jobs are processed in submission order. The planner decides which results
/// are still wanted; the worker never drops anything itself.
pub struct ParseWorker {
    jobs: Sender<ParseJob>,
    results: Receiver<ParseOutcome>,
}

impl ParseWorker {
    pub fn spawn() -> Self {
        let (tx, rx) = std::sync::mpsc::channel::<ParseJob>();
        let (result_tx, result_rx) = std::sync::mpsc::channel::<ParseOutcome>();
        thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                let ParseJob { request_id, upload } = job;
                let result = dataset::parse_upload(&upload);
                let outcome = ParseOutcome {
                    request_id,
                    file_name: upload.name,
                    file_size: upload.size,
                    result,
                };
                if result_tx.send(outcome).is_err() {
                    break;
                }
            }
        });
        Self {
            jobs: tx,
            results: result_rx,
        }
    }

    /// Queue a job; hands the upload back if the worker thread is gone.
    pub(super) fn submit(&self, request_id: u64, upload: FileUpload) -> Result<(), FileUpload> {
        self.jobs
            .send(ParseJob { request_id, upload })
            .map_err(|err| err.0.upload)
    }

    /// Next finished parse, if any, without blocking.
    pub fn try_recv(&self) -> Option<ParseOutcome> {
        match self.results.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next finished parse.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ParseOutcome> {
        self.results.recv_timeout(timeout).ok()
    }
}
