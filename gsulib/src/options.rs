//! Настройки вывода QIF: имена счетов, получатель, категории сплитов.
//!
//! Читаются из YAML; отсутствующие ключи берутся по умолчанию.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QifOptions {
    /// Инвестиционный счёт (`!Account` / `TInvst`).
    pub investment_account: String,
    /// Денежный счёт, куда приходит payroll (`TBank`).
    pub cash_account: String,
    pub payee: String,
    /// Имя бумаги вместо табличного.
    pub security: Option<String>,
    pub categories: Categories,
}

impl Default for QifOptions {
    fn default() -> Self {
        QifOptions {
            investment_account: "GSU".into(),
            cash_account: "Payroll".into(),
            payee: "GSU".into(),
            security: None,
            categories: Categories::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Categories {
    pub gross_pay: String,
    pub federal: String,
    pub medicare: String,
    pub state: String,
    pub local: String,
}

impl Default for Categories {
    fn default() -> Self {
        Categories {
            gross_pay: "Wages & Salary:Gross Pay".into(),
            federal: "Taxes:Federal Income Tax".into(),
            medicare: "Taxes:Medicare Tax".into(),
            state: "Taxes:State Income Tax".into(),
            local: "Taxes:Local Income Tax".into(),
        }
    }
}

impl QifOptions {
    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(r)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GsuError;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "cash_account: Checking\ncategories:\n  state: Taxes:NYS Income Tax\n";
        let opts = QifOptions::from_reader(yaml.as_bytes()).unwrap();
        assert_eq!(opts.cash_account, "Checking");
        assert_eq!(opts.investment_account, "GSU");
        assert_eq!(opts.categories.state, "Taxes:NYS Income Tax");
        assert_eq!(opts.categories.federal, "Taxes:Federal Income Tax");
        assert_eq!(opts.security, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = QifOptions::from_reader("cash_acount: Checking\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GsuError::Yaml(_)));
    }
}
