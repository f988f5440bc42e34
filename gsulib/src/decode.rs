//! Декодеры значений из строк выписки. Чистые функции без паники.

use crate::error::DecodeError;
use crate::model::Value;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Разделитель процента и суммы в строках налогов.
pub const RATE_SEPARATOR: &str = " % ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Text,
    Number,
    Currency,
    Date,
    /// `$536.09 / 25-Aug-2014` - берём только цену.
    PriceDate,
    /// `(13)` - удержанное количество, возвращается модуль.
    Parenthesized,
    /// `39.6000 % $4,020.68`
    RateCurrency,
}

impl Decoder {
    pub fn decode(self, s: &str) -> Result<Value, DecodeError> {
        Ok(match self {
            Decoder::Text => Value::Text(s.to_string()),
            Decoder::Number => Value::Amount(number(s)?),
            Decoder::Currency => Value::Amount(currency(s)?),
            Decoder::Date => Value::Date(date(s)?),
            Decoder::PriceDate => Value::Amount(price_date(s)?),
            Decoder::Parenthesized => Value::Amount(parenthesized(s)?),
            Decoder::RateCurrency => {
                let (rate, amount) = rate_currency(s)?;
                Value::RatedAmount { rate, amount }
            }
        })
    }
}

pub fn number(s: &str) -> Result<Decimal, DecodeError> {
    let plain = s.replace(',', "");
    Decimal::from_str(plain.trim()).map_err(|_| DecodeError::Number(s.to_string()))
}

pub fn currency(s: &str) -> Result<Decimal, DecodeError> {
    let rest = s
        .strip_prefix('$')
        .ok_or_else(|| DecodeError::Currency(s.to_string()))?;
    number(rest)
}

pub fn date(s: &str) -> Result<NaiveDate, DecodeError> {
    NaiveDate::parse_from_str(s, "%d-%b-%Y").map_err(|_| DecodeError::Date(s.to_string()))
}

pub fn price_date(s: &str) -> Result<Decimal, DecodeError> {
    let (price, _) = s.split_once('/').unwrap_or((s, ""));
    currency(price.trim_end())
}

pub fn parenthesized(s: &str) -> Result<Decimal, DecodeError> {
    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| DecodeError::Parentheses(s.to_string()))?;
    number(inner)
}

pub fn rate_currency(s: &str) -> Result<(f64, Decimal), DecodeError> {
    let (rate, amount) = s.split_once(RATE_SEPARATOR).ok_or_else(|| DecodeError::Separator {
        sep: RATE_SEPARATOR,
        text: s.to_string(),
    })?;
    let rate: f64 = rate
        .trim()
        .parse()
        .map_err(|_| DecodeError::Rate(rate.to_string()))?;
    Ok((rate, currency(amount.trim())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn number_drops_grouping() {
        assert_eq!(number("16,082.70").unwrap(), dec("16082.70"));
        assert_eq!(number("30").unwrap(), dec("30"));
        assert_eq!(number("1,0x").unwrap_err(), DecodeError::Number("1,0x".into()));
    }

    #[test]
    fn currency_requires_dollar() {
        assert_eq!(currency("$6,629.30").unwrap(), dec("6629.30"));
        assert_eq!(
            currency("6,629.30").unwrap_err(),
            DecodeError::Currency("6,629.30".into())
        );
        assert!(currency("").is_err());
    }

    #[test]
    fn date_is_day_month_year() {
        assert_eq!(
            date("25-Aug-2014").unwrap(),
            NaiveDate::from_ymd_opt(2014, 8, 25).unwrap()
        );
        assert!(date("2014-08-25").is_err());
    }

    #[test]
    fn price_date_keeps_price() {
        assert_eq!(price_date("$536.09 / 25-Aug-2014").unwrap(), dec("536.09"));
        assert_eq!(price_date("$536.09").unwrap(), dec("536.09"));
        assert!(price_date("536.09 / 25-Aug-2014").is_err());
    }

    #[test]
    fn parenthesized_returns_magnitude() {
        assert_eq!(parenthesized("(13)").unwrap(), dec("13"));
        assert_eq!(parenthesized("(1,013)").unwrap(), dec("1013"));
        assert_eq!(parenthesized("13").unwrap_err(), DecodeError::Parentheses("13".into()));
        assert!(parenthesized("(13").is_err());
        assert!(parenthesized("(").is_err());
    }

    #[test]
    fn rate_currency_splits_on_percent() {
        let (rate, amount) = rate_currency("39.6000 % $4,020.68").unwrap();
        assert!((rate - 39.6).abs() < 1e-9);
        assert_eq!(amount, dec("4020.68"));

        assert!(matches!(
            rate_currency("39.6000% $4,020.68"),
            Err(DecodeError::Separator { .. })
        ));
        assert!(matches!(rate_currency("abc % $1.00"), Err(DecodeError::Rate(_))));
        assert!(matches!(rate_currency("2.35 % 377.95"), Err(DecodeError::Currency(_))));
    }
}
