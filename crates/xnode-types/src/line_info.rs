use std::fmt;

/// A source position attached out-of-band to a node stream.
///
/// Line info never rides inside an ordinary node. Writers emit it as its
/// own marker node, and readers absorb the marker and report it as the
/// position of the next real node they surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineInfo {
    /// 1-based line number. Zero means "unknown".
    pub line_number: u32,
    /// 1-based column on `line_number`. Zero means "unknown".
    pub line_position: u32,
}

impl LineInfo {
    #[must_use]
    pub fn new(line_number: u32, line_position: u32) -> Self {
        Self {
            line_number,
            line_position,
        }
    }
}

impl fmt::Display for LineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_number, self.line_position)
    }
}
