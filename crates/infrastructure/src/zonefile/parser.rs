use rbldns_application::ports::{MatchStore, MatchStoreBuilder};
use rbldns_domain::{
    parse_maxrange4, parse_ttl, DomainError, NameServers, Record, ReloadScope,
    ReloadScopeBuilder, Soa,
};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, warn};

use super::line::{classify, expand_short_a, split_record, LineKind};

/// Result of one complete parse pass.
pub struct ParsedZone {
    pub store: Arc<dyn MatchStore>,
    pub scope: Arc<ReloadScope>,
    /// Record lines that were logged and skipped.
    pub rejected: usize,
}

/// Single-pass reader for the rbldnsd zone-file format.
///
/// Directives update an open [`ReloadScopeBuilder`]; record lines are handed
/// to a fresh store builder with the scope state in force at that line.
pub struct ZoneFileParser<'s> {
    source: &'s str,
    scope: ReloadScopeBuilder,
    builder: Box<dyn MatchStoreBuilder>,
    line_no: usize,
    rejected: usize,
}

impl<'s> ZoneFileParser<'s> {
    pub fn new(source: &'s str, builder: Box<dyn MatchStoreBuilder>) -> Self {
        Self {
            source,
            scope: ReloadScopeBuilder::new(),
            builder,
            line_no: 0,
            rejected: 0,
        }
    }

    /// Feeds every line of `reader`, then seals store and scope.
    ///
    /// Only an I/O failure aborts the pass; malformed lines, including lines
    /// that are not valid UTF-8, are skipped.
    pub fn parse_reader<R: BufRead>(
        mut self,
        reader: R,
        source_mtime: Option<u64>,
    ) -> Result<ParsedZone, DomainError> {
        for line in reader.split(b'\n') {
            let line = line.map_err(|e| DomainError::SourceRead {
                source_id: self.source.to_string(),
                reason: e.to_string(),
            })?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);
            match std::str::from_utf8(line) {
                Ok(text) => self.feed_line(text),
                Err(e) => self.reject_undecodable(&e),
            }
        }
        Ok(self.finish(source_mtime))
    }

    fn reject_undecodable(&mut self, error: &std::str::Utf8Error) {
        self.line_no += 1;
        self.rejected += 1;
        warn!(
            source = self.source,
            line = self.line_no,
            error = %error,
            "Skipping line that is not valid UTF-8"
        );
    }

    pub fn parse_str(mut self, text: &str, source_mtime: Option<u64>) -> ParsedZone {
        for line in text.lines() {
            self.feed_line(line);
        }
        self.finish(source_mtime)
    }

    pub fn feed_line(&mut self, line: &str) {
        self.line_no += 1;
        match classify(line) {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Directive(body) => {
                if let Err(e) = self.directive(body) {
                    warn!(
                        source = self.source,
                        line = self.line_no,
                        error = %e,
                        "Ignoring directive"
                    );
                }
            }
            LineKind::Defaults(body) => self.defaults(body),
            LineKind::Record(body) => {
                if let Err(e) = self.record(body) {
                    self.rejected += 1;
                    match e {
                        DomainError::MaxRangeExceeded { .. } => warn!(
                            source = self.source,
                            line = self.line_no,
                            error = %e,
                            "MAXRANGE4 prohibits entry"
                        ),
                        _ => warn!(
                            source = self.source,
                            line = self.line_no,
                            error = %e,
                            "Skipping malformed record line"
                        ),
                    }
                }
            }
        }
    }

    fn directive(&mut self, body: &str) -> Result<(), DomainError> {
        let (command, args) = body
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((body, ""));

        match command {
            "SOA" => {
                let soa = Soa::parse(args)?;
                if !self.scope.set_soa(soa) {
                    warn!(source = self.source, line = self.line_no, "Multiple SOA entries, ignoring");
                }
            }
            "NS" => {
                let ns = NameServers::parse(args)?;
                if !self.scope.set_ns(ns) {
                    warn!(source = self.source, line = self.line_no, "Multiple NS entries, ignoring");
                }
            }
            "TTL" => {
                let ttl = args.split(':').next().unwrap_or_default();
                self.scope.set_ttl(parse_ttl(ttl)?);
            }
            "MAXRANGE4" => {
                let limit = self.scope.limit_maxrange4(parse_maxrange4(args)?);
                debug!(source = self.source, limit, "MAXRANGE4 in force");
            }
            "=" => {
                if args.is_empty() {
                    return Err(DomainError::InvalidDirective(body.to_string()));
                }
                if !self.scope.set_base_template(args) {
                    debug!(source = self.source, line = self.line_no, "Base template already set");
                }
            }
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                let index = usize::from(digit.as_bytes()[0] - b'0');
                self.scope.set_variable(index, args)?;
            }
            _ => {
                warn!(source = self.source, line = self.line_no, command, "Unknown directive");
            }
        }
        Ok(())
    }

    fn defaults(&mut self, body: &str) {
        let (a, txt) = match body.split_once(':') {
            Some((a, txt)) => (a.trim(), Some(Arc::from(txt))),
            None => (body.trim(), None),
        };
        let a = if a.is_empty() {
            self.scope.default_a()
        } else if a.contains('.') {
            Arc::from(a)
        } else {
            expand_short_a(a)
        };
        self.scope.set_defaults(a, txt);
    }

    fn record(&mut self, body: &str) -> Result<(), DomainError> {
        let default_a = self.scope.default_a();
        let default_txt = self.scope.default_txt();
        let spec = split_record(body, &default_a, default_txt.as_ref());

        let mut record = Record::new(spec.a)
            .with_txt(spec.txt)
            .with_ttl(self.scope.ttl());
        if spec.excluded {
            record = record.mark_excluded();
        }

        self.builder
            .insert(spec.key, record, self.scope.maxrange4())
    }

    pub fn finish(self, source_mtime: Option<u64>) -> ParsedZone {
        let scope = Arc::new(self.scope.freeze(source_mtime));
        let store = self.builder.finish(&scope);
        debug!(
            source = self.source,
            lines = self.line_no,
            count = store.count(),
            rejected = self.rejected,
            "Parse pass finished"
        );
        ParsedZone {
            store,
            scope,
            rejected: self.rejected,
        }
    }
}
