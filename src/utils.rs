use chrono::{DateTime, Local};

/// Timestamp format used in generated file names, e.g. `24-03-09-14-05-59`
pub const FILE_STAMP_FORMAT: &str = "%y-%m-%d-%H-%M-%S";

pub fn file_stamp(at: DateTime<Local>) -> String {
    at.format(FILE_STAMP_FORMAT).to_string()
}

/// `<prefix> <yy-MM-dd-HH-mm-ss><suffix>`
pub fn timestamped_file_name(prefix: &str, suffix: &str, at: DateTime<Local>) -> String {
    format!("{} {}{}", prefix, file_stamp(at), suffix)
}

/// Appends `suffix` unless the name already ends with it.
pub fn with_suffix(name: &str, suffix: &str) -> String {
    if name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}
