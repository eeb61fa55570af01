use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("file contains no records")]
    EmptyFile,

    #[error("line {line} is not a valid record: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
