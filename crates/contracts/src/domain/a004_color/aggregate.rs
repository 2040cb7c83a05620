use crate::domain::common::lenient::{lenient_i32, lenient_string};
use crate::domain::common::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Honey color classification from `cores`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "codigo", deserialize_with = "lenient_i32")]
    pub code: i32,
    #[serde(rename = "nome", default, deserialize_with = "lenient_string")]
    pub name: String,
    /// CSS color used by charts, e.g. `#F5DEB3`
    #[serde(default, deserialize_with = "lenient_string")]
    pub hex: String,
}

/// Chart color when the table has none
pub const FALLBACK_HEX: &str = "#C8A951";

impl Color {
    pub fn display_hex(&self) -> &str {
        if self.hex.trim().is_empty() {
            FALLBACK_HEX
        } else {
            self.hex.trim()
        }
    }
}

/// Code of the color with exactly this name
pub fn code_for_name(colors: &[Color], name: &str) -> Option<i32> {
    colors.iter().find(|c| c.name == name).map(|c| c.code)
}

pub fn find_by_code(colors: &[Color], code: i32) -> Option<&Color> {
    colors.iter().find(|c| c.code == code)
}

impl AggregateRoot for Color {
    type Id = i32;

    fn id(&self) -> Self::Id {
        self.code
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "cores"
    }

    fn element_name() -> &'static str {
        "Cor"
    }

    fn list_name() -> &'static str {
        "Cores"
    }

    fn tab_suffix() -> &'static str {
        "color"
    }
}
