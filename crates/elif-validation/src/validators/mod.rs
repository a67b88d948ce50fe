//! Validators with checks beyond the generic format family

pub mod mail;

pub use mail::MailFormatValidator;
