use bigdecimal::BigDecimal;

use super::order::{MenuItem, OrderLine, PricedLines};

/// Snapshot the selected items into order lines and sum their prices.
pub fn price_lines(items: &[MenuItem]) -> PricedLines {
    let lines: Vec<OrderLine> = items.iter().map(OrderLine::from).collect();
    let total = lines
        .iter()
        .fold(BigDecimal::from(0), |acc, line| acc + &line.price);
    PricedLines { lines, total }
}
