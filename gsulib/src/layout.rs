//! Раскладки выписок: упорядоченные этапы и описания полей.
//!
//! Раскладка выбирается конфигурацией (`--layout`), сканер её не угадывает.

use crate::decode::Decoder::{self, *};
use crate::error::{GsuError, Result};

/// Описание одной строки внутри этапа захвата.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Строка должна совпасть буквально.
    Literal(&'static str),
    /// Пустая строка-разделитель, отбрасывается.
    Blank,
    /// Именованное поле. `prefix` срезается, остаток обрезается по краям.
    Capture {
        name: &'static str,
        prefix: Option<&'static str>,
        decoder: Decoder,
    },
}

impl Field {
    /// Текст для сообщений об ошибке.
    pub fn expected(&self) -> String {
        match self {
            Field::Literal(s) => (*s).to_string(),
            Field::Blank => String::new(),
            Field::Capture { name, prefix: Some(p), .. } => format!("{p} <{name}>"),
            Field::Capture { name, prefix: None, .. } => format!("<{name}>"),
        }
    }
}

const fn cap(name: &'static str, decoder: Decoder) -> Field {
    Field::Capture { name, prefix: None, decoder }
}

const fn labeled(prefix: &'static str, name: &'static str, decoder: Decoder) -> Field {
    Field::Capture { name, prefix: Some(prefix), decoder }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Пропускать строки, пока не встретится `anchor[0]`.
    Seek(&'static [&'static str]),
    /// Остальные строки якоря должны идти подряд и совпадать.
    SeekPast(&'static [&'static str]),
    Capture(&'static [Field]),
    /// Принимает весь остаток ввода; всегда последний.
    ConsumeRest,
}

impl Stage {
    pub fn describe(&self) -> String {
        match self {
            Stage::Seek(anchor) => format!("anchor [{}]", anchor.first().copied().unwrap_or_default()),
            Stage::SeekPast(anchor) => {
                format!("the rest of anchor [{}]", anchor.first().copied().unwrap_or_default())
            }
            Stage::Capture(fields) => match fields.first() {
                Some(f) => format!("fields starting with [{}]", f.expected()),
                None => "no fields".to_string(),
            },
            Stage::ConsumeRest => "a line after the last section".to_string(),
        }
    }
}

fn anchored(anchor: &'static [&'static str]) -> Vec<Stage> {
    if anchor.len() > 1 {
        vec![Stage::Seek(anchor), Stage::SeekPast(anchor)]
    } else {
        vec![Stage::Seek(anchor)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    pub name: &'static str,
    pub stages: Vec<Stage>,
}

impl LayoutSpec {
    /// Добавляет завершающий `ConsumeRest`, если его нет.
    pub fn new(name: &'static str, mut stages: Vec<Stage>) -> Self {
        if stages.last() != Some(&Stage::ConsumeRest) {
            stages.push(Stage::ConsumeRest);
        }
        LayoutSpec { name, stages }
    }

    fn sections(name: &'static str, sections: &[Section]) -> Self {
        let mut stages = Vec::new();
        for &(anchor, fields) in sections {
            stages.extend(anchored(anchor));
            stages.push(Stage::Capture(fields));
        }
        LayoutSpec::new(name, stages)
    }
}

/// Исторические форматы подтверждений о выпуске акций.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Выписка 2014 года: колонка подписей, затем колонка значений.
    Original,
    /// До сплита акций (2013): без `Net Quantity` в деталях, FMV без даты.
    PreSplit,
    /// Альтернативный порядок сводки. Не поддерживается: семантика не восстановлена.
    AltSummary,
    /// После 2016: строки `Подпись: значение`, налоги перед итогами.
    Post2016,
    /// Строки налогов с процентом: `39.6000 % $4,020.68`.
    RatedTaxes,
}

impl Layout {
    pub const ALL: [Layout; 5] = [
        Layout::Original,
        Layout::PreSplit,
        Layout::AltSummary,
        Layout::Post2016,
        Layout::RatedTaxes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layout::Original => "original",
            Layout::PreSplit => "pre-split",
            Layout::AltSummary => "alt-summary",
            Layout::Post2016 => "post2016",
            Layout::RatedTaxes => "rated-taxes",
        }
    }

    pub fn spec(self) -> Result<LayoutSpec> {
        let sections = match self {
            Layout::Original => ORIGINAL,
            Layout::PreSplit => PRE_SPLIT,
            Layout::Post2016 => POST_2016,
            Layout::RatedTaxes => RATED_TAXES,
            Layout::AltSummary => return Err(GsuError::UnsupportedLayout(self.name())),
        };
        Ok(LayoutSpec::sections(self.name(), sections))
    }
}

/// Якорь раздела и поля, идущие сразу за ним.
type Section = (&'static [&'static str], &'static [Field]);

const ORIGINAL: &[Section] = &[(DETAIL_2014, DETAIL_2014_FIELDS), (SUMMARY_2014, SUMMARY_FIELDS)];
const PRE_SPLIT: &[Section] = &[(DETAIL_2013, DETAIL_2013_FIELDS), (SUMMARY_2013, SUMMARY_FIELDS)];
const POST_2016: &[Section] = &[(DETAIL_2016, DETAIL_2016_FIELDS), (TAXES_2016, TAXES_2016_FIELDS)];
const RATED_TAXES: &[Section] = &[(DETAIL_2014, DETAIL_2014_FIELDS), (SUMMARY_RATED, SUMMARY_RATED_FIELDS)];

const DETAIL_2014: &[&str] = &[
    "  Transaction Detail",
    "Security Name:",
    "Trading Symbol:",
    "Plan Name / Plan Number:",
    "Award Date:",
    "Award Type:",
    "Award ID:",
    "Award Price:",
    "Release Date:",
    "*FMV @ Vest / FMV Date:",
    "Quantity Released:",
    "Quantity Withheld:",
    "Net Quantity:",
    "Total Gain (FMV x Quantity Released):",
    "Aggregate Award Price:",
    "Taxable Compensation:",
    "  Total Release Cost Calculation",
    "Total Aggregate Award Price:",
    "Total Tax Amount:",
    "Total Release Cost:",
    "Primary Payment Method: WTC",
    "**Excess Amount:",
    "*Fair Market Value (FMV) is calculated according to the Company's Plan.",
    "**This Excess Amount will be paid to you via your Company payroll in accordance with your Company's instructions",
    "  Additional Information — Please retain this confirmation for your tax records",
    "",
];

const DETAIL_2014_FIELDS: &[Field] = &[
    cap("security_name", Text),
    cap("ticker", Text),
    cap("plan", Text),
    cap("award_date", Text),
    Field::Literal("Restricted Stock Units"),
    cap("award_id", Text),
    Field::Literal("$0.0000"),
    cap("release_date", Date),
    cap("price_per_share", PriceDate),
    cap("shares_released", Number),
    cap("shares_withheld", Parenthesized),
    cap("shares_net", Number),
    cap("gross_gain", Currency),
];

const DETAIL_2013: &[&str] = &[
    "  Transaction Detail",
    "Security Name:",
    "Trading Symbol:",
    "Plan Name / Plan Number:",
    "Award Date:",
    "Award Type:",
    "Award ID:",
    "Award Price:",
    "Release Date:",
    "*FMV @ Vest:",
    "Quantity Released:",
    "Quantity Withheld:",
    "Total Gain (FMV x Quantity Released):",
    "Aggregate Award Price:",
    "Taxable Compensation:",
    "  Total Release Cost Calculation",
    "Total Aggregate Award Price:",
    "Total Tax Amount:",
    "Total Release Cost:",
    "Primary Payment Method: WTC",
    "**Excess Amount:",
    "*Fair Market Value (FMV) is calculated according to the Company's Plan.",
    "",
];

const DETAIL_2013_FIELDS: &[Field] = &[
    cap("security_name", Text),
    cap("ticker", Text),
    cap("plan", Text),
    cap("award_date", Text),
    Field::Literal("Restricted Stock Units"),
    cap("award_id", Text),
    Field::Literal("$0.0000"),
    cap("release_date", Date),
    cap("price_per_share", Currency),
    cap("shares_released", Number),
    cap("shares_withheld", Parenthesized),
    cap("gross_gain", Currency),
];

const SUMMARY_2014: &[&str] = &[
    "Summary for Release",
    "Quantity Released:",
    "Total Release Cost Detailed Below:",
    "Quantity Withheld to Pay for Release:",
    "**Excess Amount:",
    "Net Quantity:",
    "",
    "Federal Tax",
    "Medicare Tax",
    "State Tax",
    "Local1 Tax",
    "",
    "Tax %",
    "39.6000 %",
    "2.3500 %",
    "9.6200 %",
    "4.2500 %",
    "",
    "© 2014 Morgan Stanley Smith Barney LLC. Member SIPC.",
    "",
];

const SUMMARY_2013: &[&str] = &[
    "Summary for Release",
    "Quantity Released:",
    "Total Release Cost Detailed Below:",
    "Quantity Withheld to Pay for Release:",
    "**Excess Amount:",
    "Net Quantity:",
    "",
    "Federal Tax",
    "Medicare Tax",
    "State Tax",
    "Local1 Tax",
    "",
    "Tax %",
    "25.0000 %",
    "1.4500 %",
    "6.8500 %",
    "3.8760 %",
    "",
    "© 2013 Morgan Stanley Smith Barney LLC. Member SIPC.",
    "",
];

const SUMMARY_FIELDS: &[Field] = &[
    labeled("CUSIP:", "cusip", Text),
    Field::Blank,
    Field::Blank,
    Field::Blank,
    Field::Blank,
    cap("shares_released", Number),
    cap("total_taxes", Currency),
    cap("shares_withheld", Number),
    cap("excess_amount", Currency),
    cap("shares_net", Number),
    Field::Blank,
    cap("price_per_share", Currency),
    cap("total_withheld_value", Currency),
    Field::Blank,
    cap("shares_withheld", Number),
    Field::Blank,
    Field::Literal("Tax Paid"),
    cap("tax_federal", Currency),
    cap("tax_medicare", Currency),
    cap("tax_state", Currency),
    cap("tax_local", Currency),
];

const SUMMARY_RATED: &[&str] = &[
    "Summary for Release",
    "Quantity Released:",
    "Total Release Cost Detailed Below:",
    "Quantity Withheld to Pay for Release:",
    "**Excess Amount:",
    "Net Quantity:",
    "",
    "Federal Tax",
    "Medicare Tax",
    "State Tax",
    "Local1 Tax",
    "",
    "© 2015 Morgan Stanley Smith Barney LLC. Member SIPC.",
    "",
];

const SUMMARY_RATED_FIELDS: &[Field] = &[
    labeled("CUSIP:", "cusip", Text),
    Field::Blank,
    Field::Blank,
    Field::Blank,
    Field::Blank,
    cap("shares_released", Number),
    cap("total_taxes", Currency),
    cap("shares_withheld", Number),
    cap("excess_amount", Currency),
    cap("shares_net", Number),
    Field::Blank,
    cap("price_per_share", Currency),
    cap("total_withheld_value", Currency),
    Field::Blank,
    cap("shares_withheld", Number),
    Field::Blank,
    Field::Literal("Tax % / Tax Paid"),
    cap("tax_federal", RateCurrency),
    cap("tax_medicare", RateCurrency),
    cap("tax_state", RateCurrency),
    cap("tax_local", RateCurrency),
];

const DETAIL_2016: &[&str] = &["  Release Details", "Award Details", ""];

const DETAIL_2016_FIELDS: &[Field] = &[
    labeled("Security Name:", "security_name", Text),
    labeled("Trading Symbol:", "ticker", Text),
    labeled("CUSIP:", "cusip", Text),
    labeled("Plan Name / Plan Number:", "plan", Text),
    labeled("Award Date:", "award_date", Text),
    Field::Literal("Award Type: Restricted Stock Units"),
    labeled("Award ID:", "award_id", Text),
    Field::Literal("Award Price: $0.0000"),
    Field::Blank,
    Field::Literal("Release Information"),
    labeled("Release Date:", "release_date", Date),
    labeled("*FMV @ Vest / FMV Date:", "price_per_share", PriceDate),
    labeled("Quantity Released:", "shares_released", Number),
    labeled("Quantity Withheld:", "shares_withheld", Parenthesized),
    labeled("Net Quantity:", "shares_net", Number),
    labeled("Total Gain (FMV x Quantity Released):", "gross_gain", Currency),
];

const TAXES_2016: &[&str] = &["  Tax Withholding Detail", "Tax Type / Tax Paid", ""];

const TAXES_2016_FIELDS: &[Field] = &[
    labeled("Federal Tax:", "tax_federal", Currency),
    labeled("Medicare Tax:", "tax_medicare", Currency),
    labeled("State Tax:", "tax_state", Currency),
    labeled("Local1 Tax:", "tax_local", Currency),
    labeled("Total Tax Amount:", "total_taxes", Currency),
    Field::Blank,
    labeled("Quantity Withheld to Pay for Release:", "shares_withheld", Number),
    labeled("FMV @ Vest:", "price_per_share", Currency),
    labeled("Total Release Cost:", "total_withheld_value", Currency),
    labeled("**Excess Amount:", "excess_amount", Currency),
];
