//! CSV による一括採点。
//!
//! 1行目はヘッダで `id` に続けて設問ID (`q1`..`q16`) を並べる。空欄は未回答。
//! ヘッダが不正なら最初の1件だけエラーを返して終わる。

use std::io::Read;

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, Points};
use crate::error::{Error, Result};

/// 行ごとに (回答者ID, 回答) を返す。1行の失敗で全体は止まらない。
pub fn read_bulk<'c, R: Read + 'c>(
    catalog: &'c Catalog,
    reader: R,
) -> impl Iterator<Item = Result<(String, AnswerSet)>> + 'c {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().map(|h| h.clone()).map_err(Error::from);

    let mut header_error = None;
    let columns: Vec<String> = match headers {
        Ok(headers) if headers.get(0) == Some("id") => {
            headers.iter().skip(1).map(str::to_string).collect()
        }
        Ok(headers) => {
            header_error = Some(Error::InvalidHeader(
                headers.get(0).unwrap_or_default().to_string(),
            ));
            Vec::new()
        }
        Err(e) => {
            header_error = Some(e);
            Vec::new()
        }
    };
    let unknown = columns
        .iter()
        .find(|id| catalog.question(id).is_none())
        .cloned();

    let rows = reader.into_records().map(move |record| -> Result<(String, AnswerSet)> {
        let record = record?;
        let id = record.get(0).unwrap_or_default().to_string();
        // 短い行の不足分は未回答、ヘッダより長い行は読み捨てずにエラー
        if record.len() > columns.len() + 1 {
            return Err(Error::RowTooWide {
                id,
                expected: columns.len() + 1,
                found: record.len(),
            });
        }
        let mut answers = AnswerSet::new();
        for (question, cell) in columns.iter().zip(record.iter().skip(1)) {
            if cell.is_empty() {
                continue;
            }
            let value: u8 = cell.parse().map_err(|_| Error::InvalidCell {
                question: question.clone(),
                cell: cell.to_string(),
            })?;
            answers.record(question.clone(), Points::try_from(value)?);
        }
        Ok((id, answers))
    });

    let header_problem = header_error
        .or(unknown.map(Error::UnknownQuestion))
        .map(Err);
    let fatal = header_problem.is_some();
    header_problem
        .into_iter()
        .chain(rows.take_while(move |_| !fatal))
}
