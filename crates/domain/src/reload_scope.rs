use crate::record::DEFAULT_A_VALUE;
use crate::time_value::{parse_time_value, parse_ttl};
use crate::DomainError;
use serde::Serialize;
use std::sync::Arc;

pub const VARIABLE_COUNT: usize = 10;
pub const MAX_NAMESERVERS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Soa {
    pub ttl: u32,
    pub origin: Arc<str>,
    pub contact: Arc<str>,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl Soa {
    /// Parses the argument list of a `$SOA` directive:
    /// `ttl origindn persondn serial refresh retry expire minttl`.
    pub fn parse(args: &str) -> Result<Self, DomainError> {
        let fields: Vec<&str> = args.split_whitespace().collect();
        let [ttl, origin, contact, serial, refresh, retry, expire, minimum] = fields[..] else {
            return Err(DomainError::InvalidDirective(format!("SOA {args}")));
        };
        let serial = parse_time_value(serial)?;
        Ok(Self {
            ttl: parse_ttl(ttl)?,
            origin: Arc::from(origin),
            contact: Arc::from(contact),
            serial: u32::try_from(serial)
                .map_err(|_| DomainError::InvalidDirective(format!("SOA serial {serial}")))?,
            refresh: parse_ttl(refresh)?,
            retry: parse_ttl(retry)?,
            expire: parse_ttl(expire)?,
            minimum: parse_ttl(minimum)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameServers {
    pub ttl: u32,
    pub hosts: Vec<Arc<str>>,
}

impl NameServers {
    /// Parses `ttl ns1 ns2 ...`. Hosts prefixed with `-` are commented out.
    pub fn parse(args: &str) -> Result<Self, DomainError> {
        let mut fields = args.split_whitespace();
        let ttl = fields
            .next()
            .ok_or_else(|| DomainError::InvalidDirective(format!("NS {args}")))?;
        let hosts = fields
            .filter(|ns| !ns.starts_with('-'))
            .take(MAX_NAMESERVERS)
            .map(Arc::from)
            .collect();
        Ok(Self {
            ttl: parse_ttl(ttl)?,
            hosts,
        })
    }
}

/// Directive state of one parsed source, frozen once parsing ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadScope {
    soa: Option<Soa>,
    ns: Option<NameServers>,
    ttl: Option<u32>,
    maxrange4: Option<u64>,
    variables: [Option<Arc<str>>; VARIABLE_COUNT],
    base_template: Option<Arc<str>>,
    default_a: Arc<str>,
    default_txt: Option<Arc<str>>,
}

impl Default for ReloadScope {
    fn default() -> Self {
        ReloadScopeBuilder::default().freeze(None)
    }
}

impl ReloadScope {
    pub fn soa(&self) -> Option<&Soa> {
        self.soa.as_ref()
    }

    pub fn ns(&self) -> Option<&NameServers> {
        self.ns.as_ref()
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn maxrange4(&self) -> Option<u64> {
        self.maxrange4
    }

    pub fn variable(&self, index: usize) -> Option<&str> {
        self.variables.get(index).and_then(|v| v.as_deref())
    }

    pub fn base_template(&self) -> Option<&str> {
        self.base_template.as_deref()
    }

    pub fn default_a(&self) -> &Arc<str> {
        &self.default_a
    }

    pub fn default_txt(&self) -> Option<&Arc<str>> {
        self.default_txt.as_ref()
    }
}

/// Mutable scope used while a source is being parsed.
///
/// SOA, NS and the base template keep their first value; MAXRANGE4 can only shrink.
#[derive(Debug, Default)]
pub struct ReloadScopeBuilder {
    soa: Option<Soa>,
    ns: Option<NameServers>,
    ttl: Option<u32>,
    maxrange4: Option<u64>,
    variables: [Option<Arc<str>>; VARIABLE_COUNT],
    base_template: Option<Arc<str>>,
    default_a: Option<Arc<str>>,
    default_txt: Option<Arc<str>>,
}

impl ReloadScopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an SOA was already recorded.
    pub fn set_soa(&mut self, soa: Soa) -> bool {
        if self.soa.is_some() {
            return false;
        }
        self.soa = Some(soa);
        true
    }

    /// Returns `false` when NS records were already recorded.
    pub fn set_ns(&mut self, ns: NameServers) -> bool {
        if self.ns.is_some() {
            return false;
        }
        self.ns = Some(ns);
        true
    }

    pub fn set_ttl(&mut self, ttl: u32) {
        self.ttl = Some(ttl);
    }

    /// Applies a MAXRANGE4 directive and returns the limit now in force.
    pub fn limit_maxrange4(&mut self, hosts: u64) -> u64 {
        let effective = match self.maxrange4 {
            Some(current) => current.min(hosts),
            None => hosts,
        };
        self.maxrange4 = Some(effective);
        effective
    }

    pub fn set_variable(&mut self, index: usize, value: &str) -> Result<(), DomainError> {
        let slot = self
            .variables
            .get_mut(index)
            .ok_or_else(|| DomainError::InvalidDirective(format!("variable ${index}")))?;
        *slot = Some(Arc::from(value));
        Ok(())
    }

    /// Returns `false` when a base template was already recorded.
    pub fn set_base_template(&mut self, template: &str) -> bool {
        if self.base_template.is_some() {
            return false;
        }
        self.base_template = Some(Arc::from(template));
        true
    }

    /// Default A value and, if given, default TXT template for subsequent records.
    pub fn set_defaults(&mut self, a: Arc<str>, txt: Option<Arc<str>>) {
        self.default_a = Some(a);
        if txt.is_some() {
            self.default_txt = txt;
        }
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn maxrange4(&self) -> Option<u64> {
        self.maxrange4
    }

    pub fn default_a(&self) -> Arc<str> {
        self.default_a
            .clone()
            .unwrap_or_else(|| Arc::from(DEFAULT_A_VALUE))
    }

    pub fn default_txt(&self) -> Option<Arc<str>> {
        self.default_txt.clone()
    }

    /// Freezes the scope. `source_mtime` (unix seconds) replaces an SOA serial of 0,
    /// and an SOA ttl of 0 falls back to `$TTL` when one was given.
    pub fn freeze(self, source_mtime: Option<u64>) -> ReloadScope {
        let ttl = self.ttl;
        let soa = self.soa.map(|mut soa| {
            if soa.serial == 0 {
                if let Some(mtime) = source_mtime.and_then(|m| u32::try_from(m).ok()) {
                    soa.serial = mtime;
                }
            }
            if soa.ttl == 0 {
                if let Some(ttl) = ttl {
                    soa.ttl = ttl;
                }
            }
            soa
        });

        ReloadScope {
            soa,
            ns: self.ns,
            ttl,
            maxrange4: self.maxrange4,
            variables: self.variables,
            base_template: self.base_template,
            default_a: self
                .default_a
                .unwrap_or_else(|| Arc::from(DEFAULT_A_VALUE)),
            default_txt: self.default_txt,
        }
    }
}

/// Converts a MAXRANGE4 argument (`256` or `/24`) into a host count.
pub fn parse_maxrange4(arg: &str) -> Result<u64, DomainError> {
    let arg = arg.trim();
    let invalid = || DomainError::InvalidDirective(format!("MAXRANGE4 {arg}"));
    match arg.strip_prefix('/') {
        Some(bits) => {
            let len: u32 = bits.parse().map_err(|_| invalid())?;
            if len > 32 {
                return Err(invalid());
            }
            Ok(1u64 << (32 - len))
        }
        None => arg.parse().map_err(|_| invalid()),
    }
}
