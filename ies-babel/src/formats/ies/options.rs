use crate::grammar::DEFAULT_LINE_WIDTH;
use serde::{Deserialize, Serialize};

/// Output settings of the IES serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IesOptions {
    /// Maximum length of a wrapped angle or candela line
    pub line_width: usize,
}

impl Default for IesOptions {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}
