//! gsulib — разбор подтверждений о выпуске акций (RSU/GSU) и запись проводок в QIF.
//!
//! Поток данных: строки → [`scanner::Scanner`] → [`model::Record`] →
//! [`reconcile::reconcile`] → [`formats::qif`].

pub mod decode;
pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod reconcile;
pub mod scanner;
pub mod traits;

pub mod formats {
    pub mod qif;
}
