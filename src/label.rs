use thiserror::Error;

pub const FILL: char = '_';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("label `{prefix}` + `{suffix}` is {} characters wide, exceeding the display width of {width}", .prefix.len() + .suffix.len())]
pub struct LabelError {
    pub prefix: String,
    pub suffix: String,
    pub width: usize,
}

/// Joins `prefix` and `suffix` with as many [`FILL`] characters as needed to
/// reach exactly `width`. Labels that do not fit are rejected, never truncated.
pub fn pad(prefix: &str, suffix: &str, width: usize) -> Result<String, LabelError> {
    let used = prefix.len() + suffix.len();
    let Some(fill) = width.checked_sub(used) else {
        return Err(LabelError {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            width,
        });
    };

    let mut label = String::with_capacity(width);
    label.push_str(prefix);
    label.extend(std::iter::repeat_n(FILL, fill));
    label.push_str(suffix);
    Ok(label)
}

#[cfg(test)]
#[path = "label_test.rs"]
mod label_test;
