use gsulib::{
    formats::qif::{CashGroup, InvestmentGroup},
    layout::Layout,
    options::QifOptions,
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: выписка 2014 года из stdin -> обе группы QIF в stdout
    let rel = Layout::Original.read(std::io::BufReader::new(std::io::stdin()))?;
    let opts = QifOptions::default();
    InvestmentGroup(&opts).write(std::io::stdout(), &rel)?;
    CashGroup(&opts).write(std::io::stdout(), &rel)?;
    Ok(())
}
