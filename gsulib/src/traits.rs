//! Трэйты чтения выписки и записи проводок на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::Release};
use std::io::{BufRead, Write};

/// Читает выписку целиком и возвращает уже сверенный выпуск.
pub trait ReadFormat {
    fn read<R: BufRead>(&self, r: R) -> Result<Release>;
}

pub trait WriteFormat {
    fn write<W: Write>(&self, w: W, rel: &Release) -> Result<()>;
}
