use std::fmt::{Display, Formatter};

/// Cell anchoring the append to the top-left of the sheet.
const TOP_LEFT: &str = "A1";

/// A1-notation range handed to `values.append`.
///
/// The backend finds the table at this range and writes after its last row,
/// so anchoring at `A1` and naming the bare sheet behave the same for sheets
/// whose data starts in column A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendRange(String);

impl AppendRange {
    pub fn new(sheet_name: &str, anchor_top_left: bool) -> Self {
        let sheet = quote_sheet_name(sheet_name);
        if anchor_top_left {
            AppendRange(format!("{}!{}", sheet, TOP_LEFT))
        } else {
            AppendRange(sheet)
        }
    }
}

/// Always quoted: a bare name such as `Q1` or `FY2024` reads as a cell on the
/// first sheet.
fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

impl Display for AppendRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AppendRange {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<AppendRange> for String {
    fn from(range: AppendRange) -> Self {
        range.0
    }
}
