use siftflow::fragments::{compare, numeric};
use siftflow::{ConditionBuilder, Evaluator, OrderBy};

#[derive(Debug)]
struct Sale {
    region: &'static str,
    rep: &'static str,
    amount: i64,
}

fn main() {
    let sales = vec![
        Sale { region: "north", rep: "ana", amount: 1_200 },
        Sale { region: "south", rep: "ben", amount: 300 },
        Sale { region: "north", rep: "cai", amount: 800 },
        Sale { region: "east", rep: "dee", amount: -150 },
        Sale { region: "south", rep: "eli", amount: 2_100 },
        Sale { region: "north", rep: "ana", amount: 450 },
    ];

    let positive = ConditionBuilder::<Sale>::new()
        .add_field(|s| &s.amount, numeric::is_positive())
        .and_then(|b| b.add_field(|s| &s.region, compare::not_equal_to("west")))
        .expect("failed to build condition");
    let evaluator = Evaluator::from_builder(&positive);

    println!("sales by region:");
    for (region, count) in evaluator.count_by_group(&sales, |s| s.region) {
        println!("  {region}: {count}");
    }

    println!("revenue by region:");
    match evaluator.sum_by_group(&sales, |s| s.region, |s| s.amount) {
        Ok(totals) => {
            for (region, total) in totals {
                println!("  {region}: {total}");
            }
        }
        Err(err) => println!("error: {err}"),
    }

    match evaluator.average_by_group(&sales, |s| s.region, |s| s.amount) {
        Ok(averages) => {
            for (region, avg) in averages {
                println!("  {region} average: {}", avg.round_dp(2));
            }
        }
        Err(err) => println!("error: {err}"),
    }

    let best = evaluator
        .top_by_group(&sales, |s| s.region, 1, OrderBy::desc("amount", |s: &Sale| s.amount))
        .expect("count is positive");
    for (region, rows) in best {
        println!("  best in {region}: {}", rows[0].rep);
    }

    println!("reps with several sales:");
    for (rep, rows) in evaluator.duplicates_by_group(&sales, |s| s.rep) {
        println!("  {rep}: {}", rows.len());
    }
}
