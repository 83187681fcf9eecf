pub mod home;
pub mod invite;
pub mod login;
pub mod signup;
pub mod tester;
