use conduit_examples::{PostsApi, models};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let api = PostsApi::new();

    let post = api.get_post(1).await?;
    println!("fetched: [{}] {}", post.id, post.title);

    let created = api
        .create_post(&models::NewPost {
            title: "hello".to_string(),
            body: "from conduit".to_string(),
            user_id: 1,
        })
        .await?;
    println!("created: [{}] {}", created.id, created.title);

    let patched = api.set_title(1, "renamed").await?;
    println!("patched: [{}] {}", patched.id, patched.title);

    api.delete_post(1).await?;
    println!("deleted: [1]");

    Ok(())
}
