use std::sync::Arc;
use std::thread;

use siftflow::fragments::compare;
use siftflow::{ConditionBuilder, Evaluator};

#[derive(Debug)]
struct User {
    age: u32,
    status: &'static str,
}

fn main() {
    let evaluator = Arc::new(Evaluator::from_builder(
        &ConditionBuilder::<User>::new()
            .add_field(|u| &u.age, compare::greater_than_or_equal(18_u32))
            .and_then(|b| b.add_field(|u| &u.status, compare::equal_to("active")))
            .expect("failed to build condition"),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let e = Arc::clone(&evaluator);
            thread::spawn(move || {
                // Each thread scores its own batch
                let batch: Vec<User> = (0..100)
                    .map(|n| User {
                        age: 10 + (n + i * 7) % 20,
                        status: if n % 5 == 0 { "suspended" } else { "active" },
                    })
                    .collect();

                let allowed = e.count(&batch);
                println!("Thread {i}: {allowed} of {} allowed", batch.len());
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
