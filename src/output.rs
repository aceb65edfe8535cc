// src/output.rs
use crate::error::Result;
use crate::types::{LookupResult, RadonError, RunSummary};
use log::debug;
use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::Receiver;

/// Addresses and alias targets whose output lines are suppressed. Alias
/// targets match with or without the trailing root dot.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilters {
    addrs: HashSet<String>,
    aliases: HashSet<String>,
}

impl IgnoreFilters {
    pub fn new<A, B>(addrs: A, aliases: B) -> Self
    where
        A: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
    {
        Self {
            addrs: addrs.into_iter().collect(),
            aliases: aliases
                .into_iter()
                .map(|alias| alias.trim_end_matches('.').to_string())
                .collect(),
        }
    }

    pub fn ignores_addr(&self, addr: &str) -> bool {
        self.addrs.contains(addr)
    }

    pub fn ignores_alias(&self, alias: &str) -> bool {
        self.aliases.contains(alias.trim_end_matches('.'))
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Single consumer of lookup results. Writes are serialised through one
/// lock so lines from different results never interleave.
#[derive(Clone)]
pub struct OutputManager {
    filters: IgnoreFilters,
    writer: SharedWriter,
}

impl OutputManager {
    pub fn new(filters: IgnoreFilters, writer: Box<dyn Write + Send>) -> Self {
        Self {
            filters,
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub fn stdout(filters: IgnoreFilters) -> Self {
        Self::new(filters, Box::new(std::io::stdout()))
    }

    /// Formats every record of `result` that survives the ignore filters.
    pub fn render(&self, result: &LookupResult) -> Vec<String> {
        let domain = &result.domain;
        let mut lines = Vec::new();

        for addr in result.addresses.iter().filter(|a| !self.filters.ignores_addr(a)) {
            lines.push(format!("{} has address {}", domain, addr));
        }
        for txt in &result.txt {
            lines.push(format!("{} has TXT {}", domain, txt));
        }
        for mx in &result.mx {
            lines.push(format!("{} has MX {}", domain, mx));
        }
        for host in &result.ptr_hosts {
            lines.push(format!("{} domain name pointer {}", domain, host));
        }
        if let Some(cname) = result.cname.as_deref().filter(|c| !self.filters.ignores_alias(c)) {
            lines.push(format!("{} is an alias for {}", domain, cname));
        }

        lines
    }

    /// Renders `result` and writes its lines under one lock acquisition.
    /// Returns the number of lines written.
    pub fn write_result(&self, result: &LookupResult) -> Result<usize> {
        let lines = self.render(result);
        if lines.is_empty() {
            return Ok(0);
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| RadonError::OutputError("output lock poisoned".to_string()))?;
        for line in &lines {
            writeln!(writer, "{}", line).map_err(|e| RadonError::OutputError(e.to_string()))?;
        }
        writer.flush().map_err(|e| RadonError::OutputError(e.to_string()))?;

        Ok(lines.len())
    }

    /// Consumes results until `expected` have been rendered or every
    /// producer has gone away.
    pub async fn drain(&self, results: &mut Receiver<LookupResult>, expected: usize) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        while summary.results < expected {
            let Some(result) = results.recv().await else {
                break;
            };
            debug!("domain result {:?}", result);

            summary.results += 1;
            summary.failed_lookups += result.errors.len();
            if result.has_records() {
                summary.with_records += 1;
            }
            summary.lines_written += self.write_result(&result)?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{LookupError, RecordKind};
    use std::time::Duration;

    /// In-memory writer whose contents can be read back after the
    /// manager took ownership of it.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn full_result() -> LookupResult {
        LookupResult {
            domain: "www.example.com".to_string(),
            addresses: vec!["192.0.2.1".to_string(), "192.0.2.2".to_string()],
            txt: vec!["v=spf1 -all".to_string()],
            mx: vec!["10 mx.example.com.".to_string()],
            cname: Some("edge.cdn.example.net.".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_all_fields() {
        let output = OutputManager::new(IgnoreFilters::default(), Box::new(SharedBuffer::default()));
        assert_eq!(
            output.render(&full_result()),
            vec![
                "www.example.com has address 192.0.2.1",
                "www.example.com has address 192.0.2.2",
                "www.example.com has TXT v=spf1 -all",
                "www.example.com has MX 10 mx.example.com.",
                "www.example.com is an alias for edge.cdn.example.net.",
            ]
        );
    }

    #[test]
    fn test_render_applies_ignore_filters() {
        let filters = IgnoreFilters::new(
            vec!["192.0.2.2".to_string()],
            vec!["edge.cdn.example.net.".to_string()],
        );
        let output = OutputManager::new(filters, Box::new(SharedBuffer::default()));
        let lines = output.render(&full_result());

        assert!(lines.iter().any(|l| l.ends_with("has address 192.0.2.1")));
        assert!(!lines.iter().any(|l| l.contains("192.0.2.2")));
        assert!(!lines.iter().any(|l| l.contains("is an alias for")));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_alias_filter_ignores_trailing_dot() {
        let filters = IgnoreFilters::new(
            Vec::new(),
            vec!["parked.example.net".to_string(), "lb.example.org.".to_string()],
        );
        assert!(filters.ignores_alias("parked.example.net."));
        assert!(filters.ignores_alias("parked.example.net"));
        assert!(filters.ignores_alias("lb.example.org"));
        assert!(!filters.ignores_alias("edge.example.net."));

        let output = OutputManager::new(filters, Box::new(SharedBuffer::default()));
        let mut result = LookupResult::new("shop.example.com");
        result.cname = Some("parked.example.net.".to_string());
        assert!(output.render(&result).is_empty());
    }

    #[test]
    fn test_render_ptr_hosts() {
        let output = OutputManager::new(IgnoreFilters::default(), Box::new(SharedBuffer::default()));
        let mut result = LookupResult::new("192.0.2.1");
        result.ptr_hosts.push("host.example.com.".to_string());

        assert_eq!(
            output.render(&result),
            vec!["192.0.2.1 domain name pointer host.example.com."]
        );
    }

    #[test]
    fn test_errors_are_not_rendered() {
        let buffer = SharedBuffer::default();
        let output = OutputManager::new(IgnoreFilters::default(), Box::new(buffer.clone()));
        let mut result = LookupResult::new("gone.example.com");
        result.errors.insert(
            RecordKind::Address,
            LookupError::Timeout {
                kind: RecordKind::Address,
                domain: "gone.example.com".to_string(),
                after: Duration::from_secs(1),
            },
        );

        assert_eq!(output.write_result(&result).unwrap(), 0);
        assert!(buffer.contents().is_empty());
    }

    #[tokio::test]
    async fn test_drain_stops_at_expected_count() {
        let buffer = SharedBuffer::default();
        let output = OutputManager::new(IgnoreFilters::default(), Box::new(buffer.clone()));
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);

        tx.send(full_result()).await.unwrap();
        tx.send(LookupResult::new("empty.example.com")).await.unwrap();
        tx.send(full_result()).await.unwrap();

        let summary = output.drain(&mut rx, 2).await.unwrap();
        assert_eq!(summary.results, 2);
        assert_eq!(summary.with_records, 1);
        assert_eq!(summary.lines_written, 5);
        assert_eq!(buffer.contents().lines().count(), 5);
    }

    #[tokio::test]
    async fn test_drain_ends_when_producers_close() {
        let output = OutputManager::new(IgnoreFilters::default(), Box::new(SharedBuffer::default()));
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        tx.send(LookupResult::new("a.example.com")).await.unwrap();
        drop(tx);

        let summary = output.drain(&mut rx, 10).await.unwrap();
        assert_eq!(summary.results, 1);
    }
}
