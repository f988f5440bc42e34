//! Построчный сканер: курсор по этапам раскладки и курсор по полям этапа.

use crate::{
    error::{DecodeError, GsuError, Result},
    layout::{Field, Layout, LayoutSpec, Stage},
    model::{Record, Release},
    reconcile::reconcile,
    traits::ReadFormat,
};
use std::io::BufRead;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
struct Active {
    stage: usize,
    cursor: usize,
}

pub struct Scanner<'a> {
    layout: &'a LayoutSpec,
    next: usize,
    active: Option<Active>,
    record: Record,
    line_no: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(layout: &'a LayoutSpec) -> Self {
        Scanner {
            layout,
            next: 0,
            active: None,
            record: Record::default(),
            line_no: 0,
        }
    }

    /// Прогоняет весь ввод и запечатывает запись.
    pub fn scan<R: BufRead>(mut self, r: R) -> Result<Record> {
        for line in r.lines() {
            let line = line?;
            self.feed(&line)?;
        }
        self.finish()
    }

    pub fn feed(&mut self, raw: &str) -> Result<()> {
        self.line_no += 1;
        let line = raw.trim_end();

        let mut active = match self.active.take() {
            Some(a) => a,
            None => self.activate(line)?,
        };
        if self.advance(&mut active, line)? {
            self.active = Some(active);
        } else {
            debug!(layout = self.layout.name, stage = active.stage, line_no = self.line_no, "stage complete");
        }
        Ok(())
    }

    /// Запись готова, когда активирован завершающий `ConsumeRest`
    /// (или пройден последний этап раскладки без него).
    pub fn finish(self) -> Result<Record> {
        let stages = &self.layout.stages;
        let pending = match self.active {
            Some(a) if stages[a.stage] == Stage::ConsumeRest => None,
            Some(a) => Some((a.stage, a.cursor)),
            None if self.next < stages.len() => Some((self.next, 0)),
            None => None,
        };

        if let Some((idx, cursor)) = pending {
            let stage = &stages[idx];
            let expected = match stage {
                Stage::SeekPast(anchor) => anchor
                    .get(cursor + 1)
                    .map(|l| format!("anchor line {} [{l}]", cursor + 1))
                    .unwrap_or_else(|| stage.describe()),
                Stage::Capture(fields) => fields
                    .get(cursor)
                    .map(|f| format!("field {cursor} [{}]", f.expected()))
                    .unwrap_or_else(|| stage.describe()),
                _ => stage.describe(),
            };
            return Err(GsuError::TruncatedInput { stage: idx, expected });
        }

        debug!(layout = self.layout.name, fields = self.record.len(), "record sealed");
        Ok(self.record)
    }

    fn activate(&mut self, line: &str) -> Result<Active> {
        let stage = self.next;
        if stage >= self.layout.stages.len() {
            return Err(self.mismatch(stage, 0, line, "end of input (unexpected trailing input)"));
        }
        self.next += 1;
        debug!(layout = self.layout.name, stage, line_no = self.line_no, "stage active");
        Ok(Active { stage, cursor: 0 })
    }

    /// `true` - этап остаётся активным на следующей строке.
    fn advance(&mut self, active: &mut Active, line: &str) -> Result<bool> {
        let stage = self.layout.stages[active.stage];
        match stage {
            Stage::Seek(anchor) => Ok(anchor.first().is_some_and(|a| line != *a)),
            Stage::SeekPast(anchor) => {
                let idx = active.cursor + 1;
                let expected = anchor.get(idx).copied().unwrap_or("end of anchor");
                if line != expected {
                    return Err(self.mismatch(active.stage, idx, line, expected));
                }
                active.cursor += 1;
                Ok(active.cursor + 1 < anchor.len())
            }
            Stage::Capture(fields) => {
                let field_idx = active.cursor;
                let Some(field) = fields.get(field_idx) else {
                    return Err(self.mismatch(active.stage, field_idx, line, "end of fields"));
                };
                self.apply(active.stage, field_idx, field, line)?;
                active.cursor += 1;
                Ok(active.cursor < fields.len())
            }
            Stage::ConsumeRest => Ok(true),
        }
    }

    fn apply(&mut self, stage: usize, field_idx: usize, field: &Field, line: &str) -> Result<()> {
        match *field {
            Field::Literal(text) => {
                if line != text {
                    return Err(self.mismatch(stage, field_idx, line, text));
                }
            }
            Field::Blank => {
                if !line.is_empty() {
                    return Err(self.mismatch(stage, field_idx, line, ""));
                }
            }
            Field::Capture { name, prefix, decoder } => {
                let decode_err = |source| GsuError::Decode {
                    stage,
                    field: field_idx,
                    line_no: self.line_no,
                    name,
                    source,
                };
                let raw = match prefix {
                    Some(p) => line
                        .strip_prefix(p)
                        .ok_or_else(|| decode_err(DecodeError::Prefix { prefix: p, text: line.to_string() }))?
                        .trim(),
                    None => line,
                };
                let value = decoder.decode(raw).map_err(decode_err)?;
                trace!(field = name, %value, line_no = self.line_no, "captured");

                let line_no = self.line_no;
                self.record
                    .capture(name, value)
                    .map_err(|c| GsuError::ConsistencyConflict {
                        name,
                        line_no,
                        old: c.old.to_string(),
                        new: c.new.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    fn mismatch(&self, stage: usize, field: usize, line: &str, expected: &str) -> GsuError {
        GsuError::StructuralMismatch {
            stage,
            field,
            line_no: self.line_no,
            line: line.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Сканирование, типизация и сверка: на выходе только полностью проверенный выпуск.
impl ReadFormat for LayoutSpec {
    fn read<R: BufRead>(&self, r: R) -> Result<Release> {
        let record = Scanner::new(self).scan(r)?;
        let release = Release::from_record(&record)?;
        reconcile(&release)?;
        Ok(release)
    }
}

impl ReadFormat for Layout {
    fn read<R: BufRead>(&self, r: R) -> Result<Release> {
        self.spec()?.read(r)
    }
}
