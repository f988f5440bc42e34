//! Сверка запечатанной записи.
//!
//! Все денежные тождества проверяются точным равенством `Decimal`.
//! Проценты налогов сравниваются приближённо: они нужны только для списка допустимых ставок.

use crate::model::{Release, TaxRates};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Бумага, которую может выдавать план.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Security {
    pub ticker: &'static str,
    pub name: &'static str,
    pub cusip: &'static str,
    /// Имя бумаги в инвестиционном счёте QIF.
    pub display: &'static str,
}

pub const SECURITIES: &[Security] = &[
    Security {
        ticker: "GOOG",
        name: "GOOGLE INC CL C",
        cusip: "38259P706",
        display: "Google Inc Class C",
    },
    Security {
        ticker: "GOOGL",
        name: "GOOGLE INC-CL A",
        cusip: "38259P508",
        display: "Google Inc Class A",
    },
];

pub fn lookup(ticker: &str) -> Option<&'static Security> {
    SECURITIES.iter().find(|s| s.ticker == ticker)
}

pub const FEDERAL_RATES: &[f64] = &[25.0, 39.6];
pub const MEDICARE_RATES: &[f64] = &[1.45, 2.35];
const RATE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    TaxSum,
    ShareSplit,
    WithholdingSplit,
    WithheldValue,
    GrossGain,
    Security,
    TaxRate,
}

impl Identity {
    pub fn number(self) -> u8 {
        match self {
            Identity::TaxSum => 1,
            Identity::ShareSplit => 2,
            Identity::WithholdingSplit => 3,
            Identity::WithheldValue => 4,
            Identity::GrossGain => 5,
            Identity::Security => 6,
            Identity::TaxRate => 7,
        }
    }

    pub fn equation(self) -> &'static str {
        match self {
            Identity::TaxSum => "tax_federal + tax_medicare + tax_state + tax_local == total_taxes",
            Identity::ShareSplit => "shares_released == shares_withheld + shares_net",
            Identity::WithholdingSplit => "total_taxes + excess_amount == total_withheld_value",
            Identity::WithheldValue => "price_per_share * shares_withheld == total_withheld_value",
            Identity::GrossGain => "shares_released * price_per_share == gross_gain",
            Identity::Security => "ticker determines security name and CUSIP",
            Identity::TaxRate => "federal and medicare rates are known withholding rates",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.equation())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identity {identity}: {detail}")]
pub struct Violation {
    pub identity: Identity,
    pub detail: String,
}

/// Проверяет тождества по порядку; первое нарушенное прерывает сверку.
pub fn reconcile(rel: &Release) -> Result<(), Violation> {
    exact(
        Identity::TaxSum,
        sum(&[rel.tax_federal, rel.tax_medicare, rel.tax_state, rel.tax_local]),
        rel.total_taxes,
    )?;
    exact(
        Identity::ShareSplit,
        sum(&[rel.shares_withheld, rel.shares_net]),
        rel.shares_released,
    )?;
    exact(
        Identity::WithholdingSplit,
        sum(&[rel.total_taxes, rel.excess_amount]),
        rel.total_withheld_value,
    )?;
    exact(
        Identity::WithheldValue,
        rel.price_per_share.checked_mul(rel.shares_withheld),
        rel.total_withheld_value,
    )?;
    exact(
        Identity::GrossGain,
        rel.shares_released.checked_mul(rel.price_per_share),
        rel.gross_gain,
    )?;
    check_security(rel)?;
    if let Some(rates) = &rel.tax_rates {
        check_rates(rates)?;
    }

    debug!(ticker = %rel.ticker, release_date = %rel.release_date, "release reconciled");
    Ok(())
}

fn sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

fn exact(identity: Identity, left: Option<Decimal>, right: Decimal) -> Result<(), Violation> {
    match left {
        Some(left) if left == right => Ok(()),
        Some(left) => Err(Violation {
            identity,
            detail: format!("{left} != {right}"),
        }),
        None => Err(Violation {
            identity,
            detail: "arithmetic overflow".to_string(),
        }),
    }
}

fn check_security(rel: &Release) -> Result<(), Violation> {
    let violation = |detail: String| Violation {
        identity: Identity::Security,
        detail,
    };
    let sec = lookup(&rel.ticker).ok_or_else(|| violation(format!("unknown ticker [{}]", rel.ticker)))?;
    if rel.security_name != sec.name {
        return Err(violation(format!(
            "{} should be [{}], got [{}]",
            sec.ticker, sec.name, rel.security_name
        )));
    }
    if rel.cusip != sec.cusip {
        return Err(violation(format!(
            "{} CUSIP should be [{}], got [{}]",
            sec.ticker, sec.cusip, rel.cusip
        )));
    }
    Ok(())
}

fn check_rates(rates: &TaxRates) -> Result<(), Violation> {
    let known = |allowed: &[f64], rate: f64| allowed.iter().any(|a| (a - rate).abs() < RATE_TOLERANCE);
    if !known(FEDERAL_RATES, rates.federal) {
        return Err(Violation {
            identity: Identity::TaxRate,
            detail: format!("federal rate {} % is not one of {FEDERAL_RATES:?}", rates.federal),
        });
    }
    if !known(MEDICARE_RATES, rates.medicare) {
        return Err(Violation {
            identity: Identity::TaxRate,
            detail: format!("medicare rate {} % is not one of {MEDICARE_RATES:?}", rates.medicare),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn release() -> Release {
        Release {
            security_name: "GOOGLE INC CL C".into(),
            ticker: "GOOG".into(),
            cusip: "38259P706".into(),
            plan: "GSU Class C / 2012 Stock Plan".into(),
            award_date: "25-Jan-2014".into(),
            award_id: "C123456".into(),
            release_date: NaiveDate::from_ymd_opt(2014, 8, 25).unwrap(),
            price_per_share: dec("536.09"),
            shares_released: dec("30"),
            shares_withheld: dec("13"),
            shares_net: dec("17"),
            gross_gain: dec("16082.70"),
            total_taxes: dec("6629.30"),
            excess_amount: dec("339.87"),
            total_withheld_value: dec("6969.17"),
            tax_federal: dec("4020.68"),
            tax_medicare: dec("377.95"),
            tax_state: dec("1547.16"),
            tax_local: dec("683.51"),
            tax_rates: None,
        }
    }

    fn violated(rel: &Release) -> Identity {
        reconcile(rel).unwrap_err().identity
    }

    #[test]
    fn consistent_release_passes() {
        reconcile(&release()).unwrap();
    }

    #[test]
    fn each_identity_is_enforced() {
        let mut r = release();
        r.tax_local = dec("683.52");
        assert_eq!(violated(&r), Identity::TaxSum);

        let mut r = release();
        r.shares_net = dec("18");
        assert_eq!(violated(&r), Identity::ShareSplit);

        let mut r = release();
        r.excess_amount = dec("339.88");
        assert_eq!(violated(&r), Identity::WithholdingSplit);

        // 3 сходится, а цена на удержанные акции - нет
        let mut r = release();
        r.total_withheld_value = dec("6969.18");
        r.excess_amount = dec("339.88");
        assert_eq!(violated(&r), Identity::WithheldValue);

        let mut r = release();
        r.gross_gain = dec("16082.71");
        assert_eq!(violated(&r), Identity::GrossGain);
    }

    #[test]
    fn security_table_is_authoritative() {
        let mut r = release();
        r.cusip = "38259P508".into();
        assert_eq!(violated(&r), Identity::Security);

        let mut r = release();
        r.ticker = "GOOGL".into();
        assert_eq!(violated(&r), Identity::Security);

        let mut r = release();
        r.ticker = "GOOGL".into();
        r.security_name = "GOOGLE INC-CL A".into();
        r.cusip = "38259P508".into();
        reconcile(&r).unwrap();

        let mut r = release();
        r.ticker = "MSFT".into();
        let err = reconcile(&r).unwrap_err();
        assert_eq!(err.identity, Identity::Security);
        assert!(err.detail.contains("MSFT"));
    }

    #[test]
    fn rates_must_be_known() {
        let mut r = release();
        r.tax_rates = Some(TaxRates {
            federal: 39.6,
            medicare: 2.35,
            state: 9.62,
            local: 4.25,
        });
        reconcile(&r).unwrap();

        r.tax_rates = Some(TaxRates {
            federal: 28.0,
            medicare: 2.35,
            state: 9.62,
            local: 4.25,
        });
        assert_eq!(violated(&r), Identity::TaxRate);

        r.tax_rates = Some(TaxRates {
            federal: 25.0,
            medicare: 1.5,
            state: 9.62,
            local: 4.25,
        });
        assert_eq!(violated(&r), Identity::TaxRate);
    }

    #[test]
    fn violation_message_names_identity() {
        let mut r = release();
        r.shares_net = dec("18");
        let msg = reconcile(&r).unwrap_err().to_string();
        assert_eq!(
            msg,
            "identity 2 (shares_released == shares_withheld + shares_net): 31 != 30"
        );
    }
}
