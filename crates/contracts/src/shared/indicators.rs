use serde::{Deserialize, Serialize};

/// How to format a card value on the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    Money,
    Weight,
    Number { decimals: u8 },
    Percent { decimals: u8 },
    Integer,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        use super::format::*;
        match self {
            ValueFormat::Money => format_money(value),
            ValueFormat::Weight => format_weight(value),
            ValueFormat::Number { decimals } => format_decimal(value, *decimals as usize),
            ValueFormat::Percent { decimals } => {
                format!("{}%", format_decimal(value, *decimals as usize))
            }
            ValueFormat::Integer => format_integer(value),
        }
    }
}

/// Visual status of a card (drives colour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorStatus {
    Good,
    Bad,
    Neutral,
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format() {
        assert_eq!(ValueFormat::Money.format(10.5), "R$ 10,50");
        assert_eq!(ValueFormat::Weight.format(1000.0), "1.000,00 kg");
        assert_eq!(ValueFormat::Percent { decimals: 1 }.format(12.34), "12,3%");
        assert_eq!(ValueFormat::Integer.format(7.0), "7");
    }
}
