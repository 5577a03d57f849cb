use compact_str::CompactString;
use rbldns_domain::config::FastlistPortConfig;
use rbldns_domain::{DomainError, Record, DEFAULT_A_VALUE};
use std::sync::Arc;

const FIELD_COUNT: usize = 6;
const DEFAULT_TTL: u32 = 120;
const DEFAULT_EXPIRATION_SECS: u64 = 12 * 3600;

/// Values used for empty datagram fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastlistDefaults {
    pub a: Arc<str>,
    pub txt: Option<Arc<str>>,
    pub ttl: u32,
    /// Seconds until an added entry expires; 0 never expires.
    pub expiration: u64,
}

impl Default for FastlistDefaults {
    fn default() -> Self {
        Self {
            a: Arc::from(DEFAULT_A_VALUE),
            txt: None,
            ttl: DEFAULT_TTL,
            expiration: DEFAULT_EXPIRATION_SECS,
        }
    }
}

impl FastlistDefaults {
    /// Applies per-port overrides; fields missing in `config` keep their value.
    pub fn apply(&mut self, config: &FastlistPortConfig) {
        if let Some(a) = &config.a {
            self.a = Arc::from(a.as_str());
        }
        if let Some(txt) = &config.txt {
            self.txt = Some(Arc::from(txt.as_str()));
        }
        if let Some(ttl) = config.ttl {
            self.ttl = ttl;
        }
        if let Some(expiration) = config.expiration {
            self.expiration = expiration;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastlistCommand {
    Add { name: CompactString, record: Record },
    Delete { name: CompactString },
}

/// Parses `name \t a \t txt \t action \t ttl \t expiration`.
///
/// Missing trailing fields and empty fields take `defaults`; an empty action
/// means add.
pub fn parse_datagram(
    payload: &[u8],
    defaults: &FastlistDefaults,
    now_secs: u64,
) -> Result<FastlistCommand, DomainError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| DomainError::InvalidDatagram("not valid UTF-8".to_string()))?;

    let mut fields = [""; FIELD_COUNT];
    for (slot, field) in fields.iter_mut().zip(text.trim_end_matches(['\r', '\n']).split('\t')) {
        *slot = field.trim();
    }
    let [name, a, txt, action, ttl, expiration] = fields;

    if name.is_empty() {
        return Err(DomainError::InvalidDatagram("empty name".to_string()));
    }
    let name = CompactString::from(name.trim_end_matches('.').to_ascii_lowercase());

    match action {
        "" | "a" | "add" => {}
        "d" | "delete" => return Ok(FastlistCommand::Delete { name }),
        other => {
            return Err(DomainError::InvalidDatagram(format!("unknown action: {other}")));
        }
    }

    let ttl = if ttl.is_empty() {
        defaults.ttl
    } else {
        ttl.parse()
            .map_err(|_| DomainError::InvalidDatagram(format!("invalid ttl: {ttl}")))?
    };
    let expiration = if expiration.is_empty() {
        defaults.expiration
    } else {
        expiration.parse().map_err(|_| {
            DomainError::InvalidDatagram(format!("invalid expiration: {expiration}"))
        })?
    };

    let a = if a.is_empty() { defaults.a.clone() } else { Arc::from(a) };
    let txt = if txt.is_empty() {
        defaults.txt.clone()
    } else {
        Some(Arc::from(txt))
    };
    let expires_at = (expiration != 0).then(|| now_secs.saturating_add(expiration));

    Ok(FastlistCommand::Add {
        name,
        record: Record::new(a)
            .with_txt(txt)
            .with_ttl(Some(ttl))
            .with_expiry(expires_at),
    })
}
