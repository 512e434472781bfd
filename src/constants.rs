/// Package kinds as stored in `membership_packages.package_type`
pub const PACKAGE_FREE_GYM: &str = "free_gym";
pub const PACKAGE_STANDARD: &str = "standard";
pub const PACKAGE_PILATES: &str = "pilates";
pub const PACKAGE_PERSONAL_TRAINING: &str = "personal_training";
pub const PACKAGE_PERSONAL: &str = "personal";

/// Checkpoints (days from start) for time-travel evaluation
pub const DEFAULT_TIMELINE_OFFSETS: [i64; 6] = [0, 15, 30, 31, 60, 90];

/// Expiry warning thresholds, in days
pub const EXPIRY_IMMINENT_DAYS: i64 = 3;
pub const EXPIRY_SOON_DAYS: i64 = 7;
pub const EXPIRY_UPCOMING_DAYS: i64 = 30;

/// Default log level when `LOG_LEVEL` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
