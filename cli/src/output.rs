//! Plain-text replay report

use std::fmt::Write;

use kwyd_types::ItemCategory;

use crate::replay::ReplayOutcome;

pub fn render(outcome: &ReplayOutcome) -> String {
    let mut out = String::new();

    for line in &outcome.messages {
        let _ = writeln!(out, "{line}");
    }
    if !outcome.messages.is_empty() {
        out.push('\n');
    }

    for kill in &outcome.kills {
        let _ = writeln!(
            out,
            "event {:>3}  {:<20} <- {:<20} {:?}: {} item(s)",
            kill.event,
            kill.victim,
            kill.killer.as_deref().unwrap_or("-"),
            kill.state,
            kill.collected
        );
    }

    for loot in &outcome.loots {
        let _ = writeln!(
            out,
            "\nevent {} {} (party {}): delivered {}{}",
            loot.event,
            loot.site.label(),
            loot.party.0,
            loot.report.delivered,
            if loot.report.cleared_vanilla {
                ", vanilla loot cleared"
            } else {
                ""
            }
        );
        if loot.roster.is_empty() {
            let _ = writeln!(out, "  (empty roster)");
        }
        for element in &loot.roster {
            let item = &element.item;
            let category: ItemCategory = item.item.category();
            let _ = writeln!(
                out,
                "  {:>3} x {:<32} {:<12} value {:>7}  tier {}",
                element.amount,
                item.display_name(),
                category.label(),
                item.item.value,
                item.item.tier
            );
        }
    }

    out
}
