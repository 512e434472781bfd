pub mod access_service;
pub mod dates;
pub mod integrity_service;

pub use access_service::{
    AccessService, ExpiryNotice, effectively_active, evaluate_access, evaluate_timeline,
    expiry_notices,
};
pub use dates::{ExpiryWarning, days_until_expiry, expiry_warning, today_utc};
pub use integrity_service::{
    AuditOptions, IntegrityService, find_anomalies, find_anomalies_with, summarize,
};
