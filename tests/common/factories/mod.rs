pub mod deposit_factory;
pub mod membership_factory;

#[allow(unused_imports)]
pub use deposit_factory::DepositFactory;
#[allow(unused_imports)]
pub use membership_factory::MembershipFactory;
