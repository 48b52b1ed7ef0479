use siftflow::fragments::{compare, text};
use siftflow::{ConditionBuilder, Evaluator, OrderBy};

#[derive(Debug)]
struct User {
    id: u32,
    name: String,
    age: u32,
    status: &'static str,
}

fn main() {
    let users = vec![
        User { id: 1, name: "ana".into(), age: 17, status: "active" },
        User { id: 2, name: "ben".into(), age: 25, status: "active" },
        User { id: 3, name: "cai".into(), age: 15, status: "active" },
        User { id: 4, name: "dee".into(), age: 41, status: "suspended" },
    ];

    // Define the condition
    let condition = ConditionBuilder::<User>::new()
        .add_field(|u| &u.age, compare::greater_than_or_equal(18_u32))
        .and_then(|b| b.add_field(|u| &u.status, compare::equal_to("active")))
        .and_then(|b| b.add_field(|u| &u.name, text::not_empty()))
        .expect("failed to build condition");

    println!("{}", condition.build());

    let evaluator =
        Evaluator::from_builder(&condition).sort(OrderBy::desc("age", |u: &User| u.age));

    for user in evaluator.filter_all(&users) {
        println!("allowed: {} ({})", user.name, user.id);
    }
    for user in evaluator.failed_all(&users) {
        println!("denied:  {} ({})", user.name, user.id);
    }

    match evaluator.evaluate(&users[1]) {
        Ok(allowed) => println!("user 2 allowed: {allowed}"),
        Err(err) => println!("error: {err}"),
    }
}
