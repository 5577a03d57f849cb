mod lookup_service;
mod zone;

pub use lookup_service::LookupService;
pub use zone::Zone;
