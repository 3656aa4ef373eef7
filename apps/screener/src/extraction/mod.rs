// Text → structured models.
// JD parsing and resume parsing share the tokenizer and the pattern matchers;
// neither touches the filesystem.

pub mod jd_parser;
pub mod patterns;
pub mod resume_parser;
pub mod tokens;
