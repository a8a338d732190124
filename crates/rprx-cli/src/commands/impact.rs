//! Impact parsing command

use anyhow::Result;
use rprx_core::ImpactParser;

pub fn cmd_impact(parser: &ImpactParser, text: &str) -> Result<()> {
    let parsed = parser.parse_detailed(Some(text));

    println!(
        "💵 ${:.0} - ${:.0} per year",
        parsed.range.low, parsed.range.high
    );
    println!("   Basis: {}", parsed.basis.as_str());
    if parsed.monthly {
        println!("   Annualized from a monthly amount");
    }

    Ok(())
}
