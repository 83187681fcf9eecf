pub mod session;
pub mod terpene;
pub mod tester;
