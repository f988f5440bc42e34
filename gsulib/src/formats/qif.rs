//! QIF: заголовок счёта и две группы проводок по одному выпуску.
//!
//! Инвестиционная группа - покупка всех выпущенных акций и продажа удержанных
//! по той же цене. Денежная группа - одна сплит-проводка: доход и четыре налога.

use crate::{
    error::Result,
    model::Release,
    options::QifOptions,
    reconcile,
};
use std::fmt::Write as FmtWrite;
use std::io::Write;

pub const DATE_FORMAT: &str = "%m/%d/%y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Investment,
    Bank,
}

impl AccountKind {
    fn tag(self) -> &'static str {
        match self {
            AccountKind::Investment => "Invst",
            AccountKind::Bank => "Bank",
        }
    }
}

/// Пишется один раз, при создании файла.
pub fn write_account_header<W: Write>(mut w: W, name: &str, kind: AccountKind) -> Result<()> {
    let mut s = String::new();
    let _ = writeln!(s, "!Account");
    let _ = writeln!(s, "N{name}");
    let _ = writeln!(s, "T{}", kind.tag());
    let _ = writeln!(s, "^");
    let _ = writeln!(s, "!Type:{}", kind.tag());
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Buy + sell-to-cover.
pub struct InvestmentGroup<'a>(pub &'a QifOptions);

impl crate::traits::WriteFormat for InvestmentGroup<'_> {
    fn write<W: Write>(&self, mut w: W, rel: &Release) -> Result<()> {
        let security = security_name(self.0, rel);
        let date = rel.release_date.format(DATE_FORMAT);

        let mut s = String::new();
        let _ = writeln!(s, "D{date}");
        let _ = writeln!(s, "NBuy");
        let _ = writeln!(s, "Y{security}");
        let _ = writeln!(s, "I{}", rel.price_per_share);
        let _ = writeln!(s, "Q{}", rel.shares_released);
        let _ = writeln!(s, "T{}", rel.gross_gain);
        let _ = writeln!(s, "MRelease {}", rel.award_id);
        let _ = writeln!(s, "^");

        let _ = writeln!(s, "D{date}");
        let _ = writeln!(s, "NSell");
        let _ = writeln!(s, "Y{security}");
        let _ = writeln!(s, "I{}", rel.price_per_share);
        let _ = writeln!(s, "Q{}", rel.shares_withheld);
        let _ = writeln!(s, "T{}", rel.total_withheld_value);
        let _ = writeln!(s, "MSell to cover {}", rel.award_id);
        let _ = writeln!(s, "^");

        w.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Payroll-проводка: доход плюс отрицательные налоги, итог = доход - налоги.
pub struct CashGroup<'a>(pub &'a QifOptions);

impl crate::traits::WriteFormat for CashGroup<'_> {
    fn write<W: Write>(&self, mut w: W, rel: &Release) -> Result<()> {
        let cat = &self.0.categories;

        let mut s = String::new();
        let _ = writeln!(s, "D{}", rel.release_date.format(DATE_FORMAT));
        let _ = writeln!(s, "P{}", self.0.payee);
        let _ = writeln!(s, "M{} release {}", rel.ticker, rel.award_id);
        let _ = writeln!(s, "T{}", rel.net_cash());
        let splits = [
            (&cat.gross_pay, rel.gross_gain),
            (&cat.federal, -rel.tax_federal),
            (&cat.medicare, -rel.tax_medicare),
            (&cat.state, -rel.tax_state),
            (&cat.local, -rel.tax_local),
        ];
        for (category, amount) in splits {
            let _ = writeln!(s, "S{category}");
            let _ = writeln!(s, "${amount}");
        }
        let _ = writeln!(s, "^");

        w.write_all(s.as_bytes())?;
        Ok(())
    }
}

fn security_name(opts: &QifOptions, rel: &Release) -> String {
    if let Some(name) = &opts.security {
        return name.clone();
    }
    reconcile::lookup(&rel.ticker)
        .map(|s| s.display.to_string())
        .unwrap_or_else(|| rel.security_name.clone())
}
