//! Дозапись групп проводок в файлы QIF.

use gsulib::{
    error::Result,
    formats::qif::{write_account_header, AccountKind},
};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Открытый на дозапись файл счёта.
///
/// Оба файла открываются до записи в любой из них: если второй открыть не
/// удалось, только что созданный первый убирается через [`Ledger::abandon`].
pub struct Ledger<'a> {
    path: &'a Path,
    file: File,
    created: bool,
}

impl<'a> Ledger<'a> {
    pub fn open(path: &'a Path) -> Result<Self> {
        let (file, created) = match OpenOptions::new().append(true).create_new(true).open(path) {
            Ok(f) => (f, true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                (OpenOptions::new().append(true).open(path)?, false)
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Ledger { path, file, created })
    }

    /// Удаляет файл, если он был создан этим запуском.
    pub fn abandon(self) -> io::Result<()> {
        let Ledger { path, file, created } = self;
        drop(file);
        if created {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Дописывает `body` в конец файла. Заголовок счёта пишется, только если
    /// файл создан этим запуском. Возвращает `true` для нового файла.
    pub fn append(self, account: &str, kind: AccountKind, body: &[u8]) -> Result<bool> {
        let mut w = BufWriter::new(self.file);
        if self.created {
            write_account_header(&mut w, account, kind)?;
        }
        w.write_all(body)?;
        w.flush()?;
        Ok(self.created)
    }
}
