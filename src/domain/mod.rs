pub mod access;
pub mod anomaly;
pub mod membership;

pub use access::{AccessState, Checkpoint, QrCategory};
pub use anomaly::Anomaly;
pub use membership::{Deposit, Membership, MembershipStatus};
