//! Multi-language text resolution for behaviour-driven browser test suites.
//!
//! Scenario steps look UI texts up through [`i18n::LanguageResolver`], the
//! runner drives language switching through [`session::LanguageSession`],
//! and [`usage`] records whether a run exercised language features at all.

pub mod config;
pub mod i18n;
pub mod session;
pub mod usage;
