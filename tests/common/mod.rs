//! Shared utilities for logger integration tests.

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// In-memory stand-in for stdout.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CapturedConsole(Arc<Mutex<Vec<u8>>>);

impl CapturedConsole {
    #[allow(dead_code)]
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedConsole {
    type Writer = CapturedConsole;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Parse every line of a JSON-lines log file.
pub fn read_json_lines(path: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON: {:?} ({})", l, e)))
        .collect()
}

/// Messages of the records in a JSON-lines log file.
pub fn messages(path: &Path) -> Vec<String> {
    read_json_lines(path)
        .iter()
        .filter_map(|v| v["fields"]["message"].as_str().map(str::to_owned))
        .collect()
}
