//! Interactive questions asked when `analyze` runs without a ticker.

use std::io::{self, BufRead, Write};
use tuck::AnalysisPeriod;

/// Answers typed at the prompt. Empty date answers keep the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PromptAnswers {
    pub(crate) ticker: String,
    pub(crate) start: Option<String>,
    pub(crate) end: Option<String>,
}

/// Ask for ticker, start and end date.
///
/// The ticker question repeats until a non-blank answer is given; end of
/// input before that is an error.
pub(crate) fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    defaults: AnalysisPeriod,
) -> io::Result<PromptAnswers> {
    let ticker = loop {
        match read_answer(input, output, "Enter the stock ticker: ")? {
            Some(answer) if !answer.is_empty() => break answer,
            Some(_) => continue,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no ticker entered",
                ));
            }
        }
    };

    let start = read_answer(
        input,
        output,
        &format!(
            "Start date (MM/DD/YYYY) [{}]: ",
            defaults.start().format("%m/%d/%Y")
        ),
    )?
    .filter(|s| !s.is_empty());
    let end = read_answer(
        input,
        output,
        &format!(
            "End date (MM/DD/YYYY) [{}]: ",
            defaults.end().format("%m/%d/%Y")
        ),
    )?
    .filter(|s| !s.is_empty());

    Ok(PromptAnswers { ticker, start, end })
}

/// Print a question and read one trimmed line. `None` at end of input.
fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn defaults() -> AnalysisPeriod {
        AnalysisPeriod::ending(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
    }

    #[test]
    fn test_all_answers() {
        let mut input = Cursor::new("msft\n01/02/2020\n2023-12-29\n");
        let mut output = Vec::new();

        let answers = ask(&mut input, &mut output, defaults()).unwrap();

        assert_eq!(answers.ticker, "msft");
        assert_eq!(answers.start.as_deref(), Some("01/02/2020"));
        assert_eq!(answers.end.as_deref(), Some("2023-12-29"));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("[05/31/2024]"));
    }

    #[test]
    fn test_blank_dates_keep_defaults() {
        let mut input = Cursor::new("\n  \nIBM\n\n");
        let mut output = Vec::new();

        let answers = ask(&mut input, &mut output, defaults()).unwrap();

        assert_eq!(answers.ticker, "IBM");
        assert_eq!(answers.start, None);
        assert_eq!(answers.end, None);
    }

    #[test]
    fn test_no_ticker_before_eof() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();

        let err = ask(&mut input, &mut output, defaults()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
