//! Доменные модели: «сырая» запись сканера и её типизированный вид.

use crate::error::{GsuError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Декодированное значение поля.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Amount(Decimal),
    Date(NaiveDate),
    /// Строка налога вида `39.6000 % $4,020.68`.
    RatedAmount { rate: f64, amount: Decimal },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Amount(d) => write!(f, "{d}"),
            Value::Date(d) => write!(f, "{}", d.format("%d-%b-%Y")),
            Value::RatedAmount { rate, amount } => write!(f, "{rate} % {amount}"),
        }
    }
}

/// Повтор поля с другим значением.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub old: Value,
    pub new: Value,
}

/// Плоская запись «имя поля → значение».
///
/// Наполняется только сканером; после `Scanner::finish` доступна лишь на чтение.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(BTreeMap<&'static str, Value>);

impl Record {
    /// Первое появление поля сохраняется, повторное обязано совпасть.
    pub(crate) fn capture(&mut self, name: &'static str, new: Value) -> std::result::Result<(), Conflict> {
        match self.0.get(name) {
            Some(old) if *old != new => Err(Conflict { old: old.clone(), new }),
            Some(_) => Ok(()),
            None => {
                self.0.insert(name, new);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, name: &'static str) -> Result<&Value> {
        self.0.get(name).ok_or(GsuError::MissingField(name))
    }

    pub fn text(&self, name: &'static str) -> Result<&str> {
        match self.require(name)? {
            Value::Text(s) => Ok(s),
            _ => Err(GsuError::FieldType { name, expected: "text" }),
        }
    }

    /// Сумма или количество; для строк с процентом возвращает сумму.
    pub fn amount(&self, name: &'static str) -> Result<Decimal> {
        match self.require(name)? {
            Value::Amount(d) => Ok(*d),
            Value::RatedAmount { amount, .. } => Ok(*amount),
            _ => Err(GsuError::FieldType { name, expected: "an amount" }),
        }
    }

    pub fn date(&self, name: &'static str) -> Result<NaiveDate> {
        match self.require(name)? {
            Value::Date(d) => Ok(*d),
            _ => Err(GsuError::FieldType { name, expected: "a date" }),
        }
    }

    /// Процент налога, если строка его содержала.
    pub fn rate(&self, name: &'static str) -> Result<Option<f64>> {
        match self.require(name)? {
            Value::RatedAmount { rate, .. } => Ok(Some(*rate)),
            Value::Amount(_) => Ok(None),
            _ => Err(GsuError::FieldType { name, expected: "an amount" }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxRates {
    pub federal: f64,
    pub medicare: f64,
    pub state: f64,
    pub local: f64,
}

/// Типизированный вид запечатанной записи.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub security_name: String,
    pub ticker: String,
    pub cusip: String,
    pub plan: String,
    pub award_date: String,
    pub award_id: String,
    pub release_date: NaiveDate,
    pub price_per_share: Decimal,
    pub shares_released: Decimal,
    pub shares_withheld: Decimal,
    pub shares_net: Decimal,
    pub gross_gain: Decimal,
    pub total_taxes: Decimal,
    pub excess_amount: Decimal,
    pub total_withheld_value: Decimal,
    pub tax_federal: Decimal,
    pub tax_medicare: Decimal,
    pub tax_state: Decimal,
    pub tax_local: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rates: Option<TaxRates>,
}

impl Release {
    pub fn from_record(rec: &Record) -> Result<Self> {
        let tax_rates = match (
            rec.rate("tax_federal")?,
            rec.rate("tax_medicare")?,
            rec.rate("tax_state")?,
            rec.rate("tax_local")?,
        ) {
            (Some(federal), Some(medicare), Some(state), Some(local)) => Some(TaxRates {
                federal,
                medicare,
                state,
                local,
            }),
            _ => None,
        };

        Ok(Release {
            security_name: rec.text("security_name")?.to_string(),
            ticker: rec.text("ticker")?.to_string(),
            cusip: rec.text("cusip")?.to_string(),
            plan: rec.text("plan")?.to_string(),
            award_date: rec.text("award_date")?.to_string(),
            award_id: rec.text("award_id")?.to_string(),
            release_date: rec.date("release_date")?,
            price_per_share: rec.amount("price_per_share")?,
            shares_released: rec.amount("shares_released")?,
            shares_withheld: rec.amount("shares_withheld")?,
            shares_net: rec.amount("shares_net")?,
            gross_gain: rec.amount("gross_gain")?,
            total_taxes: rec.amount("total_taxes")?,
            excess_amount: rec.amount("excess_amount")?,
            total_withheld_value: rec.amount("total_withheld_value")?,
            tax_federal: rec.amount("tax_federal")?,
            tax_medicare: rec.amount("tax_medicare")?,
            tax_state: rec.amount("tax_state")?,
            tax_local: rec.amount("tax_local")?,
            tax_rates,
        })
    }

    /// Деньги, которые реально пришли через payroll: доход минус налоги.
    pub fn net_cash(&self) -> Decimal {
        self.gross_gain - self.total_taxes
    }
}
