use siftflow::fragments::{compare, text};
use siftflow::{ConditionBuilder, Evaluator, MemoryQuery, OrderBy, QueryHandle};

#[derive(Debug, Clone)]
struct Article {
    id: u32,
    title: String,
    words: u32,
}

async fn run() -> siftflow::Result<()> {
    let articles: Vec<Article> = (1..=40)
        .map(|id| Article {
            id,
            title: format!("Article {id}"),
            words: (id * 137) % 2_000,
        })
        .collect();

    let condition = ConditionBuilder::<Article>::new()
        .add_field(|a| &a.words, compare::greater_than(500_u32))?
        .add_field(|a| &a.title, text::contains("Article"))?;

    let evaluator = Evaluator::from_builder(&condition)
        .sort(OrderBy::desc("words", |a: &Article| a.words));
    let deferred = evaluator.on(MemoryQuery::new(articles));

    // Refining does not execute anything
    let plan = deferred.page_query(1, 3)?;
    println!("page 1 holds {} rows", plan.count().await.unwrap_or_default());

    println!("matching: {}", deferred.count().await?);
    for article in deferred.page(2, 3).await? {
        println!("  {} ({} words)", article.title, article.words);
    }

    let block = deferred.block_page(10, 2, 5).await?;
    println!(
        "block {} holds {} rows, more: {}",
        block.block(),
        block.items_in_block,
        block.has_more_blocks
    );

    println!("average words: {}", deferred.average(|a| a.words).await?.round_dp(1));
    if let Some(longest) = deferred.first().await? {
        println!("longest: #{}", longest.id);
    }
    Ok(())
}

fn main() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to start runtime");

    if let Err(err) = runtime.block_on(run()) {
        eprintln!("error: {err}");
    }
}
