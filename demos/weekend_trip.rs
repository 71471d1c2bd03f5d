//! A weekend away with four friends.
//!
//! Shows how shared expenses turn into obligations, how the obligation
//! graph shrinks under reduction, and what each netting strategy asks
//! people to pay.

use rust_decimal_macros::dec;
use split_settle::core::expense::Expense;
use split_settle::core::money;
use split_settle::core::participant::{Participant, ParticipantId};
use split_settle::graph::reducer::GraphReducer;
use split_settle::settlement::engine::SettlementEngine;
use split_settle::settlement::netting::NettingStrategy;
use split_settle::split::ItemizedSplit;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  split-settle: Weekend Trip Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let people = vec![
        Participant::new("ann", "Ann"),
        Participant::new("ben", "Ben"),
        Participant::new("cat", "Cat"),
        Participant::new("dan", "Dan"),
    ];
    let ids: Vec<ParticipantId> = people.iter().map(|p| p.id.clone()).collect();
    let [ann, ben, cat, dan] = [&ids[0], &ids[1], &ids[2], &ids[3]];

    let mut dinner = ItemizedSplit::new(ids.clone());
    dinner
        .add_item(dec!(26.50), &[ann.clone()])?
        .add_item(dec!(19), &[ben.clone()])?
        .add_item(dec!(32), &[cat.clone(), dan.clone()])?
        .add_item(dec!(14), &ids)?;

    let expenses = vec![
        Expense::even(ann.clone(), dec!(360), &ids)?.with_description("cabin"),
        Expense::itemized(ben.clone(), dec!(110), &dinner)?.with_description("dinner, tip included"),
        Expense::percentage(
            cat.clone(),
            dec!(84.60),
            &[(cat.clone(), dec!(40)), (dan.clone(), dec!(40)), (ann.clone(), dec!(20))],
        )?
        .with_description("fuel"),
        Expense::uneven(dan.clone(), dec!(45), &[(ben.clone(), dec!(25)), (cat.clone(), dec!(20))])?
            .with_description("groceries"),
    ];

    // --- Obligations ---
    println!("━━━ Raw Obligations ━━━\n");
    let engine = SettlementEngine::default();
    let mut graph = engine.obligation_graph(&people, &expenses)?;
    for ob in graph.obligations() {
        println!("  {} owes {} {}", ob.debtor(), ob.creditor(), money::format_amount(ob.amount()));
    }
    println!("  gross: {}\n", money::format_amount(graph.gross_total()));

    // --- Reduction ---
    println!("━━━ After Reduction ━━━\n");
    let summary = GraphReducer::new().reduce_in_place(&mut graph);
    for ob in graph.obligations() {
        println!("  {} owes {} {}", ob.debtor(), ob.creditor(), money::format_amount(ob.amount()));
    }
    println!(
        "  {} cycles cancelled, {} chains collapsed\n",
        summary.cycles_cancelled, summary.chains_collapsed
    );

    // --- Strategies side by side ---
    for strategy in [NettingStrategy::PairwiseDirect, NettingStrategy::AggregateGreedy] {
        println!("━━━ Settlements ({}) ━━━\n", strategy);
        for s in engine.settle_with(&people, &expenses, strategy)? {
            println!("  {}", s);
        }
        println!();
    }

    let report = engine.report(&people, &expenses)?;
    println!("{}", report);
    Ok(())
}
