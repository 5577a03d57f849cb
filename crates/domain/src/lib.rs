//! rbldns domain layer: records, directive scope, template expansion and address grammar.
pub mod config;
pub mod dataset_kind;
pub mod dataset_status;
pub mod errors;
pub mod ip4_range;
pub mod lookup_result;
pub mod record;
pub mod reload_scope;
pub mod template;
pub mod time_value;

pub use config::{CliOverrides, Config, ConfigError};
pub use dataset_kind::DatasetKind;
pub use dataset_status::{DatasetStatus, ReloadStats};
pub use errors::DomainError;
pub use ip4_range::{parse_ip4_prefix, parse_ip4_range, reverse_ipv4, unreverse_ipv4, Ip4Range};
pub use lookup_result::LookupResult;
pub use record::{Answer, Record, DEFAULT_A_VALUE};
pub use reload_scope::{parse_maxrange4, NameServers, ReloadScope, ReloadScopeBuilder, Soa};
pub use template::expand_txt;
pub use time_value::{parse_time_value, parse_ttl};
